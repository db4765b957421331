//! Official application form structure per action type.
//!
//! Chapters hold sections, sections hold questions. Question ids double as
//! answer keys in `PipelineState::answers`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ActionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Text,
    Textarea,
    Select,
    Multiselect,
    Info,
    Number,
}

impl QuestionKind {
    /// Free-text questions are the ones a document or an evaluator reads.
    pub fn is_answerable(&self) -> bool {
        matches!(self, QuestionKind::Text | QuestionKind::Textarea)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    /// Short label for display.
    pub text: String,
    /// Question as printed on the application form.
    pub full_question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    fn new(id: impl Into<String>, text: &str, full_question: &str, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: text.to_string(),
            full_question: full_question.to_string(),
            kind,
            options: Vec::new(),
        }
    }

    fn textarea(id: impl Into<String>, text: &str, full_question: &str) -> Self {
        Self::new(id, text, full_question, QuestionKind::Textarea)
    }

    fn text(id: &str, text: &str, full_question: &str) -> Self {
        Self::new(id, text, full_question, QuestionKind::Text)
    }

    fn select(id: &str, text: &str, full_question: &str, options: &[&str]) -> Self {
        let mut q = Self::new(id, text, full_question, QuestionKind::Select);
        q.options = options.iter().map(|o| o.to_string()).collect();
        q
    }

    fn multiselect(id: &str, text: &str, full_question: &str, options: &[&str]) -> Self {
        let mut q = Self::new(id, text, full_question, QuestionKind::Multiselect);
        q.options = options.iter().map(|o| o.to_string()).collect();
        q
    }

    fn info(id: &str, text: &str, full_question: &str) -> Self {
        Self::new(id, text, full_question, QuestionKind::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub questions: Vec<Question>,
}

impl Section {
    fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            questions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: u32,
    pub title: String,
    /// Questions in this chapter are answered once per consortium partner.
    pub partner_specific: bool,
    pub sections: Vec<Section>,
}

impl Chapter {
    fn new(id: u32, title: &str, sections: Vec<Section>) -> Self {
        Self {
            id,
            title: title.to_string(),
            partner_specific: false,
            sections,
        }
    }

    fn per_partner(mut self) -> Self {
        self.partner_specific = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalStructure {
    pub chapters: Vec<Chapter>,
}

const PRIORITY_OPTIONS: &[&str] = &[
    "Inclusion and diversity",
    "Digital transformation",
    "Environment and fight against climate change",
    "Participation in democratic life",
];

const LANGUAGE_OPTIONS: &[&str] = &["English", "German", "Romanian", "Croatian"];

const ORG_PRESENTATION: &str = "Please briefly present your organisation (e.g. its type, scope of work, areas of activity and if applicable, the approximate number of paid/unpaid staff, learners).";

const SUSTAINABILITY: &str = "How will you ensure the sustainability of the project? What will happen with the results after the end of the EU funding?";

const DISSEMINATION: &str = "How do you plan to make the results of your project known within your partnership, in your local communities and in the wider public? Who are the main target groups of your dissemination activities?";

impl ProposalStructure {
    /// The application form for an action type with `wp_count` work packages.
    pub fn official(action_type: ActionType, wp_count: u32) -> Self {
        let wp_count = wp_count.max(1);
        let chapters = match action_type {
            ActionType::Ka210 => ka210(wp_count),
            ActionType::Ka220 => ka220(wp_count),
        };
        Self { chapters }
    }

    /// Every question, in form order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.chapters
            .iter()
            .flat_map(|c| c.sections.iter())
            .flat_map(|s| s.questions.iter())
    }

    pub fn find_question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }
}

fn context_chapter(durations: &[&str], lump_sums: Option<&[&str]>) -> Chapter {
    let mut questions = vec![
        Question::text("projectTitle", "Project Title", "Please provide the full title of your project."),
        Question::text(
            "acronym",
            "Project Acronym",
            "Please provide a short acronym for your project (max. 10 characters).",
        ),
        Question::text(
            "startDate",
            "Project Start Date",
            "Please indicate the planned start date of your project (dd/mm/yyyy).",
        ),
        Question::select(
            "duration",
            "Project Duration",
            "Please select the total duration of your project.",
            durations,
        ),
    ];
    if let Some(options) = lump_sums {
        questions.push(Question::select(
            "lumpSum",
            "Lump Sum Amount",
            "Please select the lump sum amount you are applying for.",
            options,
        ));
    }
    questions.push(Question::text(
        "nationalAgency",
        "National Agency",
        "Please indicate the National Agency to which you are submitting this application.",
    ));
    questions.push(Question::select(
        "language",
        "Language",
        "Please select the main language used in the application.",
        LANGUAGE_OPTIONS,
    ));

    Chapter::new(1, "Context", vec![Section::new("context_general", "Project Context", questions)])
}

fn ka210(wp_count: u32) -> Vec<Chapter> {
    let activities = (1..=wp_count)
        .map(|i| {
            Section::new(
                format!("act_list_wp{}", i),
                format!("Activity {}", i),
                vec![
                    Question::textarea(
                        format!("act_content_wp{}", i),
                        "Activity content",
                        "Please describe the activity content, methodology and the expected target group(s).",
                    ),
                    Question::textarea(
                        format!("act_objectives_wp{}", i),
                        "Contribution to objectives",
                        "Please explain how this activity contributes to reaching the project objectives.",
                    ),
                    Question::textarea(
                        format!("act_budget_wp{}", i),
                        "Budget allocation",
                        "Please explain the rationale for the budget allocation of this activity.",
                    ),
                ],
            )
        })
        .collect();

    vec![
        context_chapter(
            &["6 months", "12 months", "18 months", "24 months"],
            Some(&["30.000 EUR", "60.000 EUR"][..]),
        ),
        Chapter::new(
            2,
            "Participating Organisations",
            vec![Section::new(
                "partner_intro",
                "Background and Experience",
                vec![
                    Question::textarea("org_presentation", "Organisation presentation", ORG_PRESENTATION),
                    Question::textarea(
                        "org_experience",
                        "Experience",
                        "What are the activities and experience of the organisation in the areas relevant for this project?",
                    ),
                    Question::textarea(
                        "cooperation_arrangements",
                        "Cooperation arrangements",
                        "How did you form your partnership and how will the partners cooperate and communicate during the project?",
                    ),
                ],
            )],
        )
        .per_partner(),
        Chapter::new(
            3,
            "Relevance",
            vec![
                Section::new(
                    "priorities",
                    "Priorities and topics",
                    vec![
                        Question::select(
                            "priority_main",
                            "Main priority",
                            "Please select the most relevant horizontal or sectoral priority according to the objectives of your project.",
                            PRIORITY_OPTIONS,
                        ),
                        Question::textarea(
                            "address_priorities",
                            "Addressing priorities",
                            "Please explain how your project will address the selected priorities.",
                        ),
                        Question::multiselect(
                            "topics",
                            "Topics",
                            "Please select the topics addressed by your project.",
                            &["Key Competences", "Digital skills", "Green skills", "Social inclusion"],
                        ),
                    ],
                ),
                Section::new(
                    "project_description",
                    "Project description",
                    vec![
                        Question::textarea(
                            "objectives",
                            "Objectives",
                            "What do you want to achieve by implementing the project?",
                        ),
                        Question::textarea(
                            "implementation",
                            "Implementation",
                            "How are you going to implement the project? Please describe your approach, methodology and how different activities are interconnected.",
                        ),
                        Question::textarea(
                            "results",
                            "Expected results",
                            "What are the expected results of the project? Please describe concrete outputs, products, or services that will be produced.",
                        ),
                    ],
                ),
            ],
        ),
        Chapter::new(4, "Activities", activities),
        Chapter::new(
            5,
            "Impact and Dissemination",
            vec![Section::new(
                "impact_general",
                "Impact",
                vec![
                    Question::textarea(
                        "assessment",
                        "Assessment",
                        "How will you assess the achievement of project objectives and the results produced? Please describe the evaluation indicators and methodology you will use.",
                    ),
                    Question::textarea("sustainability", "Sustainability", SUSTAINABILITY),
                    Question::textarea("dissemination", "Dissemination", DISSEMINATION),
                ],
            )],
        ),
        Chapter::new(
            6,
            "Project Summary",
            vec![Section::new(
                "summary_content",
                "Project Summary",
                vec![
                    Question::textarea(
                        "objectives_summary",
                        "Objectives",
                        "Please provide a short summary of the project objectives (this text will be publicly available if the project is funded).",
                    ),
                    Question::textarea(
                        "implementation_summary",
                        "Implementation",
                        "Please provide a short summary of the main activities (this text will be publicly available if the project is funded).",
                    ),
                    Question::textarea(
                        "results_summary",
                        "Results",
                        "Please provide a short summary of the expected results (this text will be publicly available if the project is funded).",
                    ),
                ],
            )],
        ),
    ]
}

fn ka220_design_sections(wp_count: u32) -> Vec<Section> {
    let mut sections = vec![Section::new(
        "wp_management",
        "WP1: Project Management",
        vec![
            Question::textarea(
                "monitoring_wp1",
                "Monitoring",
                "How will the progress, quality and achievement of project activities be monitored? Please give information about the involved staff, as well as the timing and frequency of the monitoring activities.",
            ),
            Question::textarea(
                "budget_control_wp1",
                "Budget control",
                "How will you ensure proper budget control and time management in your project?",
            ),
            Question::textarea(
                "risk_management_wp1",
                "Risk management",
                "What are your plans for handling risks for project implementation (e.g. delays, budget, conflicts, etc.)?",
            ),
            Question::textarea(
                "inclusion_design_wp1",
                "Inclusive design",
                "How will you ensure that the activities are designed in an accessible and inclusive way?",
            ),
            Question::textarea(
                "digital_tools_wp1",
                "Digital tools",
                "How does the project incorporate the use of digital tools and learning methods to complement the physical activities and to improve cooperation between partner organisations?",
            ),
            Question::textarea(
                "green_practices_wp1",
                "Green practices",
                "How does the project incorporate green practices in different project phases?",
            ),
            Question::textarea(
                "civic_engagement_wp1",
                "Civic engagement",
                "How does the project encourage participation and civic engagement in different project phases?",
            ),
        ],
    )];

    for i in 2..=wp_count {
        let title = if i == wp_count {
            format!("WP{}: Dissemination & Exploitation", i)
        } else {
            format!("WP{}: Implementation Phase {}", i, i - 1)
        };
        sections.push(Section::new(
            format!("wp_implementation_wp{}", i),
            title,
            vec![
                Question::textarea(
                    format!("wp_objectives_wp{}", i),
                    "WP objectives",
                    "What are the specific objectives of this work package and how do they contribute to the general objectives of the project?",
                ),
                Question::textarea(
                    format!("wp_results_wp{}", i),
                    "WP results",
                    "What will be the main results of this work package?",
                ),
                Question::textarea(
                    format!("wp_indicators_wp{}", i),
                    "Indicators",
                    "What qualitative and quantitative indicators will you use to measure the level of the achievement of the work package objectives and the quality of the results?",
                ),
                Question::textarea(
                    format!("wp_partners_wp{}", i),
                    "Partner tasks",
                    "Please describe the tasks and responsibilities of each partner organisation in the work package.",
                ),
                Question::textarea(
                    format!("wp_budget_wp{}", i),
                    "Budget",
                    "Please explain how you define the amount dedicated to the work package and how the work package is cost-effective?",
                ),
            ],
        ));
        sections.push(Section::new(
            format!("wp_activities_wp{}", i),
            format!("WP{}: Description of Activities", i),
            vec![
                Question::textarea(
                    format!("wp_act_content_wp{}", i),
                    "Activity content",
                    "Describe the content of the proposed activities.",
                ),
                Question::textarea(
                    format!("wp_act_objectives_wp{}", i),
                    "Activity objectives",
                    "Explain how these activities are going to help reach the WP objectives.",
                ),
                Question::textarea(
                    format!("wp_act_results_wp{}", i),
                    "Activity results",
                    "Describe the expected results of the activities.",
                ),
                Question::textarea(
                    format!("wp_act_participants_wp{}", i),
                    "Participants",
                    "Expected number and profile of participants.",
                ),
            ],
        ));
    }
    sections
}

fn ka220(wp_count: u32) -> Vec<Chapter> {
    vec![
        context_chapter(&["12 months", "24 months", "36 months"], None),
        Chapter::new(
            2,
            "Participating Organisations",
            vec![Section::new(
                "partner_intro",
                "For each organisation",
                vec![
                    Question::textarea("org_presentation", "Organisation presentation", ORG_PRESENTATION),
                    Question::textarea(
                        "org_experience",
                        "Experience and key staff",
                        "What are the activities and experience of the organisation in the areas relevant for this project? What are the skills and/or expertise of key persons involved in this project?",
                    ),
                    Question::textarea(
                        "org_past_participation",
                        "Past participation",
                        "Has your organisation participated in a European Union granted project in the 3 years preceding this application? If so, please specify the project reference(s).",
                    ),
                ],
            )],
        )
        .per_partner(),
        Chapter::new(
            3,
            "Relevance of the Project",
            vec![
                Section::new(
                    "priorities",
                    "Priorities and topics",
                    vec![
                        Question::select(
                            "priority_main",
                            "Main priority",
                            "Please select the most relevant horizontal or sectoral priority according to the objectives of your project.",
                            PRIORITY_OPTIONS,
                        ),
                        Question::multiselect(
                            "priority_others",
                            "Additional priorities",
                            "Please select any additional horizontal or sectoral priorities addressed by your project.",
                            PRIORITY_OPTIONS,
                        ),
                        Question::textarea(
                            "address_priorities",
                            "Addressing priorities",
                            "Please explain how your project will address the priorities you have selected.",
                        ),
                        Question::multiselect(
                            "topics",
                            "Topics",
                            "Please select the topics addressed by your project.",
                            &[
                                "Key Competences (incl. basic skills)",
                                "Digital skills",
                                "Green skills",
                                "Social inclusion",
                                "Creativity and culture",
                                "Active citizenship",
                                "Quality and innovation of education",
                            ],
                        ),
                    ],
                ),
                Section::new(
                    "description",
                    "Project description",
                    vec![
                        Question::textarea(
                            "motivation",
                            "Motivation",
                            "Please describe the motivation for your project and explain why it should be funded at European level.",
                        ),
                        Question::textarea(
                            "objectives_results",
                            "Objectives and results",
                            "What are the objectives you would like to achieve and which concrete results do you expect the project to produce? Please explain how these objectives address the needs of the target groups.",
                        ),
                        Question::textarea(
                            "innovation",
                            "Innovation",
                            "What makes your proposal innovative compared to existing practices and available solutions? How does it go beyond the state of the art?",
                        ),
                        Question::textarea(
                            "synergies",
                            "Synergies",
                            "How is your proposal suitable for creating synergies between different fields of education, training and youth or for having a particularly strong impact on one or more of those fields?",
                        ),
                        Question::textarea(
                            "eu_added_value",
                            "European added value",
                            "How does the proposal bring added value at European level through results that would not be attained by activities carried out in a single country?",
                        ),
                        Question::select(
                            "follow_up_erasmus",
                            "Erasmus+ follow-up",
                            "Is this project a follow-up of a previous Erasmus+ funded project? If yes, please describe the link with the previous project(s) and how this project builds on the previous experience.",
                            &["Yes", "No"],
                        ),
                        Question::select(
                            "follow_up_other",
                            "Other EU follow-up",
                            "Is this project a follow-up of a project funded by other EU programmes? If yes, please describe the link.",
                            &["Yes", "No"],
                        ),
                        Question::select(
                            "synergy_other",
                            "Other EU synergies",
                            "Is this project in synergy with other EU initiatives or actions? If yes, please describe the link.",
                            &["Yes", "No"],
                        ),
                    ],
                ),
                Section::new(
                    "needs_analysis",
                    "Needs analysis",
                    vec![
                        Question::textarea(
                            "needs_address",
                            "Needs",
                            "What needs do you want to address by implementing your project? How have these needs been identified?",
                        ),
                        Question::textarea(
                            "target_groups",
                            "Target groups",
                            "What are the target groups of your project? Who are the main direct and indirect beneficiaries? How will you ensure the participation of the target groups throughout the project lifecycle?",
                        ),
                        Question::textarea(
                            "needs_id",
                            "Needs identification",
                            "How did you identify the needs of your partnership and those of your target groups? What sources, data and methodologies did you use?",
                        ),
                        Question::textarea(
                            "address_needs",
                            "Addressing needs",
                            "How will your project address the identified needs of the target groups? Please explain the link between the needs and your proposed activities/results.",
                        ),
                    ],
                ),
            ],
        ),
        Chapter::new(
            4,
            "Partnership and Cooperation Arrangements",
            vec![Section::new(
                "cooperation",
                "Cooperation arrangements",
                vec![
                    Question::textarea(
                        "partnership_formation",
                        "Partnership formation",
                        "How did you form your partnership? How does the mix of participating organisations complement each other and what is the added value of this cooperation?",
                    ),
                    Question::textarea(
                        "task_allocation",
                        "Task allocation",
                        "What is the task allocation and how does it reflect the commitment, capacity and expertise of each partner? How will you ensure that all partners are actively and appropriately involved in the project?",
                    ),
                    Question::textarea(
                        "coordination",
                        "Coordination",
                        "Describe the mechanism for coordination and communication between the project partners, with stakeholders and with the National Agency if relevant.",
                    ),
                ],
            )],
        ),
        Chapter::new(
            5,
            "Impact and Dissemination",
            vec![Section::new(
                "impact_general",
                "Impact and Dissemination",
                vec![
                    Question::textarea(
                        "assessment",
                        "Assessment",
                        "How are you going to assess if the project objectives have been achieved? What indicators will you use to measure the quality and success of the project?",
                    ),
                    Question::textarea(
                        "sustainability",
                        "Sustainability",
                        "How will you ensure the sustainability of the project? What will happen with the results after the end of the EU funding? How will you ensure that the results remain available and continue to be used?",
                    ),
                    Question::textarea("dissemination", "Dissemination", DISSEMINATION),
                    Question::multiselect(
                        "impact_level",
                        "Impact levels",
                        "At which levels do you expect to have an impact? Please select all that apply.",
                        &["Local", "Regional", "National", "European", "International"],
                    ),
                    Question::textarea(
                        "impact_description",
                        "Impact description",
                        "Please describe the expected impact of the project at each level you have selected.",
                    ),
                ],
            )],
        ),
        Chapter::new(6, "Project Design and Implementation", ka220_design_sections(wp_count)),
        Chapter::new(
            7,
            "Project Summary",
            vec![Section::new(
                "summary_content",
                "Project Summary",
                vec![
                    Question::textarea(
                        "objectives_summary",
                        "Objectives",
                        "Please provide a summary of your project objectives. This text will be made publicly available if the project is funded and must be written in English.",
                    ),
                    Question::textarea(
                        "implementation_summary",
                        "Implementation",
                        "Please provide a summary of the main project activities. This text will be made publicly available if the project is funded and must be written in English.",
                    ),
                    Question::textarea(
                        "results_summary",
                        "Results",
                        "Please provide a summary of the expected project results. This text will be made publicly available if the project is funded and must be written in English.",
                    ),
                    Question::textarea(
                        "translation",
                        "English translation",
                        "If the main language of your application is not English, please provide an English translation of the summary.",
                    ),
                ],
            )],
        ),
        Chapter::new(
            8,
            "Final Evaluation",
            vec![Section::new(
                "final_evaluation",
                "Consistency & Quality Check",
                vec![
                    Question::info(
                        "eval_consistency",
                        "Consistency",
                        "Check for consistency across all sections: Are partner responsibilities aligned with WP assignments? Are KPIs measurable and realistic?",
                    ),
                    Question::info(
                        "eval_completeness",
                        "Completeness",
                        "Verify all required fields are filled and meet character limits.",
                    ),
                    Question::info(
                        "eval_quality",
                        "Quality",
                        "Assess the overall quality against Erasmus+ evaluation criteria.",
                    ),
                ],
            )],
        ),
    ]
}
