use super::domain::{AnswerOption, Question, QuestionnaireKind, RiskLabel};

/// Fixed, ordered set of questions backing one wizard.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    kind: QuestionnaireKind,
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn for_kind(kind: QuestionnaireKind) -> Self {
        match kind {
            QuestionnaireKind::AmlRisk => Self::aml_standard(),
            QuestionnaireKind::ConsumerDuty => Self::consumer_duty_standard(),
        }
    }

    pub fn aml_standard() -> Self {
        Self {
            kind: QuestionnaireKind::AmlRisk,
            questions: aml_questions(),
        }
    }

    pub fn consumer_duty_standard() -> Self {
        Self {
            kind: QuestionnaireKind::ConsumerDuty,
            questions: consumer_duty_questions(),
        }
    }

    pub const fn kind(&self) -> QuestionnaireKind {
        self.kind
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, key: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.key == key)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn aml_questions() -> Vec<Question> {
    vec![
        Question {
            key: "client_jurisdiction",
            prompt: "Where is the client resident or incorporated?",
            options: vec![
                AnswerOption {
                    value: 0,
                    label: "UK or equivalent-regime jurisdiction",
                    score: 0,
                    risk: RiskLabel::Low,
                },
                AnswerOption {
                    value: 1,
                    label: "EEA or FATF member state",
                    score: 1,
                    risk: RiskLabel::Medium,
                },
                AnswerOption {
                    value: 2,
                    label: "High-risk third country on the FATF list",
                    score: 2,
                    risk: RiskLabel::High,
                },
            ],
        },
        Question {
            key: "pep_status",
            prompt: "Is the client or any beneficial owner a politically exposed person?",
            options: vec![
                AnswerOption {
                    value: 0,
                    label: "No known PEP connection",
                    score: 0,
                    risk: RiskLabel::Low,
                },
                AnswerOption {
                    value: 1,
                    label: "Domestic PEP or close associate",
                    score: 1,
                    risk: RiskLabel::Medium,
                },
                AnswerOption {
                    value: 2,
                    label: "Foreign PEP or immediate family member",
                    score: 2,
                    risk: RiskLabel::High,
                },
            ],
        },
        Question {
            key: "sanctions_screening",
            prompt: "What did sanctions and adverse-media screening return?",
            options: vec![
                AnswerOption {
                    value: 0,
                    label: "No matches",
                    score: 0,
                    risk: RiskLabel::Low,
                },
                AnswerOption {
                    value: 1,
                    label: "Potential name match awaiting discount",
                    score: 1,
                    risk: RiskLabel::Medium,
                },
                AnswerOption {
                    value: 2,
                    label: "Confirmed sanctions match",
                    score: 2,
                    risk: RiskLabel::High,
                },
            ],
        },
        Question {
            key: "business_profile",
            prompt: "How transparent are the client's business and source of wealth?",
            options: vec![
                AnswerOption {
                    value: 0,
                    label: "Salaried income, straightforward holdings",
                    score: 0,
                    risk: RiskLabel::Low,
                },
                AnswerOption {
                    value: 1,
                    label: "Self-employed or multiple income sources",
                    score: 1,
                    risk: RiskLabel::Medium,
                },
                AnswerOption {
                    value: 2,
                    label: "Complex structures, cash-intensive, or opaque ownership",
                    score: 2,
                    risk: RiskLabel::High,
                },
            ],
        },
    ]
}

fn consumer_duty_questions() -> Vec<Question> {
    let evidence_options = || {
        vec![
            AnswerOption {
                value: 0,
                label: "Fully evidenced and reviewed this cycle",
                score: 0,
                risk: RiskLabel::Low,
            },
            AnswerOption {
                value: 1,
                label: "Partial evidence with remediation planned",
                score: 1,
                risk: RiskLabel::Medium,
            },
            AnswerOption {
                value: 2,
                label: "No evidence or known failings",
                score: 2,
                risk: RiskLabel::High,
            },
        ]
    };

    vec![
        Question {
            key: "products_and_services",
            prompt: "Are products and services designed for and distributed to the identified target market?",
            options: evidence_options(),
        },
        Question {
            key: "price_and_value",
            prompt: "Do charges represent fair value against the benefits clients receive?",
            options: evidence_options(),
        },
        Question {
            key: "consumer_understanding",
            prompt: "Do client communications support informed decisions at the right time?",
            options: evidence_options(),
        },
        Question {
            key: "consumer_support",
            prompt: "Does post-sale support let clients use their products as anticipated?",
            options: evidence_options(),
        },
    ]
}
