use std::collections::BTreeMap;

use super::{Category, CategoryKeywords, DefaultQuestionSet, Department, Language, TemplateTable};

pub(super) const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "as", "into", "through", "during", "before", "after", "above", "below", "between",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "just", "and", "but", "if", "or", "because",
    "until", "while", "about", "against", "i", "me", "my", "we", "our", "you", "your", "he",
    "him", "his", "she", "her", "it", "its", "they", "them", "their", "what", "which", "who",
    "want", "know", "get", "information", "details", "please", "kindly",
];

fn department(name: &str, display_name: &str, keywords: &[&str], description: &str) -> Department {
    Department {
        id: None,
        name: name.to_string(),
        display_name: Some(display_name.to_string()),
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        description: Some(description.to_string()),
    }
}

pub(super) fn departments() -> Vec<Department> {
    vec![
        department(
            "Municipal",
            "Municipal Corporation",
            &[
                "road", "water", "construction", "drainage", "sanitation", "street", "light",
                "garbage", "sewage", "park", "footpath", "gutter",
            ],
            "Handles civic amenities and urban infrastructure",
        ),
        department(
            "Police",
            "Police Department",
            &[
                "crime", "fir", "complaint", "investigation", "theft", "accident", "traffic",
                "security", "law", "order", "chargesheet",
            ],
            "Handles law enforcement and public safety",
        ),
        department(
            "Education",
            "Department of Education",
            &[
                "school", "college", "teacher", "student", "exam", "admission", "scholarship",
                "education", "university", "degree",
            ],
            "Handles educational institutions and policies",
        ),
        department(
            "Health",
            "Department of Health",
            &[
                "hospital", "doctor", "medicine", "health", "disease", "vaccination", "clinic",
                "medical", "treatment", "patient",
            ],
            "Handles healthcare services and policies",
        ),
        department(
            "Revenue",
            "Revenue Department",
            &[
                "land", "property", "tax", "registry", "mutation", "revenue", "ownership", "deed",
                "stamp", "khata", "khasra",
            ],
            "Handles land records and property matters",
        ),
        department(
            "Transport",
            "Transport Department",
            &[
                "license", "vehicle", "registration", "permit", "transport", "bus", "driving",
                "rto", "challan",
            ],
            "Handles vehicle registration and transport permits",
        ),
        department(
            "Electricity",
            "Electricity Board",
            &[
                "electricity", "power", "bill", "meter", "connection", "supply", "outage",
                "transformer", "load",
            ],
            "Handles electricity supply and billing",
        ),
        department(
            "PWD",
            "Public Works Department",
            &[
                "building", "bridge", "highway", "construction", "tender", "contractor",
                "infrastructure", "government building",
            ],
            "Handles public infrastructure projects",
        ),
        department(
            "Panchayat",
            "Panchayati Raj",
            &["village", "gram", "sarpanch", "rural", "panchayat", "block", "district"],
            "Handles rural local governance",
        ),
        department(
            "Social Welfare",
            "Social Welfare Department",
            &[
                "pension", "widow", "disabled", "welfare", "bpl", "ration", "subsidy", "scheme",
            ],
            "Handles social welfare schemes",
        ),
    ]
}

fn category(id: Category, name: &str, keywords: &[&str]) -> CategoryKeywords {
    CategoryKeywords {
        id,
        name: name.to_string(),
        keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
    }
}

pub(super) fn categories() -> Vec<CategoryKeywords> {
    vec![
        category(
            Category::Budget,
            "Budget & Finance",
            &[
                "budget", "money", "fund", "expense", "cost", "expenditure", "allocation",
                "financial", "amount", "payment",
            ],
        ),
        category(
            Category::Contractor,
            "Contractors & Tenders",
            &[
                "contractor", "tender", "contract", "bid", "vendor", "supplier", "construction",
                "work order",
            ],
        ),
        category(
            Category::Timeline,
            "Timeline & Progress",
            &[
                "delay", "timeline", "deadline", "schedule", "completion", "progress", "status",
                "date", "when",
            ],
        ),
        category(
            Category::Documents,
            "Documents & Records",
            &[
                "document", "file", "record", "report", "copy", "paper", "certificate", "letter",
                "order",
            ],
        ),
        category(
            Category::Personnel,
            "Personnel & Officials",
            &[
                "officer", "official", "staff", "employee", "authority", "department",
                "responsible", "incharge",
            ],
        ),
    ]
}

fn table(entries: Vec<(Category, Vec<&str>)>) -> TemplateTable {
    entries
        .into_iter()
        .map(|(category, templates)| {
            (
                category,
                templates.into_iter().map(str::to_string).collect(),
            )
        })
        .collect()
}

pub(super) fn templates() -> BTreeMap<Language, TemplateTable> {
    let english = table(vec![
        (
            Category::Budget,
            vec![
                "Provide detailed budget allocation for {topic}.",
                "Provide expenditure details for {topic} for the last {years} years.",
                "Provide copies of all financial approvals related to {topic}.",
                "Provide audit reports related to {topic}.",
            ],
        ),
        (
            Category::Contractor,
            vec![
                "Provide details of contractors involved in {topic}.",
                "Provide copies of contracts awarded for {topic}.",
                "Provide information about the tendering process for {topic}.",
                "Provide details of work orders issued for {topic}.",
            ],
        ),
        (
            Category::Timeline,
            vec![
                "Provide project timeline and milestones for {topic}.",
                "Provide reasons for any delays in {topic}.",
                "Provide expected completion date for {topic}.",
                "Provide current status of {topic}.",
            ],
        ),
        (
            Category::Documents,
            vec![
                "Provide copies of all official documents related to {topic}.",
                "Provide meeting minutes and decisions regarding {topic}.",
                "Provide correspondence related to {topic}.",
                "Provide inspection reports related to {topic}.",
            ],
        ),
        (
            Category::Personnel,
            vec![
                "Provide details of officials responsible for {topic}.",
                "Provide organizational structure related to {topic}.",
                "Provide contact information of the concerned department for {topic}.",
                "Provide details of action taken by officials regarding {topic}.",
            ],
        ),
        (
            Category::General,
            vec![
                "Provide complete details regarding {topic}.",
                "Provide current status of {topic}.",
                "Provide any reports or studies conducted on {topic}.",
                "Provide records of complaints received regarding {topic}.",
            ],
        ),
    ]);

    let hindi = table(vec![(
        Category::General,
        vec![
            "{topic} के संबंध में पूर्ण विवरण प्रदान करें।",
            "{topic} की वर्तमान स्थिति प्रदान करें।",
            "{topic} पर की गई किसी भी रिपोर्ट या अध्ययन की प्रति प्रदान करें।",
            "{topic} के संबंध में प्राप्त शिकायतों का रिकॉर्ड प्रदान करें।",
        ],
    )]);

    BTreeMap::from([(Language::English, english), (Language::Hindi, hindi)])
}

pub(super) fn default_questions() -> BTreeMap<Language, DefaultQuestionSet> {
    let english = DefaultQuestionSet {
        department_placeholder: "the department".to_string(),
        questions: [
            "Provide information about recent activities of {department}.",
            "Provide budget allocation and expenditure details.",
            "Provide details of ongoing projects.",
            "Provide organizational structure and contact details.",
            "Provide any pending complaints or grievances.",
        ]
        .iter()
        .map(|text| text.to_string())
        .collect(),
    };

    let hindi = DefaultQuestionSet {
        department_placeholder: "विभाग".to_string(),
        questions: [
            "{department} की हालिया गतिविधियों के बारे में जानकारी प्रदान करें।",
            "बजट आवंटन और व्यय विवरण प्रदान करें।",
            "चल रही परियोजनाओं का विवरण प्रदान करें।",
            "संगठनात्मक संरचना और संपर्क विवरण प्रदान करें।",
            "लंबित शिकायतों या शिकायतों का विवरण प्रदान करें।",
        ]
        .iter()
        .map(|text| text.to_string())
        .collect(),
    };

    BTreeMap::from([(Language::English, english), (Language::Hindi, hindi)])
}
