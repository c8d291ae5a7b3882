//! Declarative panel specifications.
//!
//! Every disease panel is described by static data: the ordered list of fields its classifier
//! was trained on, how each field is entered, and the pair of diagnosis messages. The field
//! order is the classifier's feature order; the classifier aligns features by position, never
//! by name.

use crate::CoreError;
use std::fmt;
use std::str::FromStr;

/// One entry of a fixed choice set and the numeric code the classifier was trained with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub label: &'static str,
    pub code: f64,
}

/// How a field is entered on the form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Free text that must parse as a number at submit time.
    Numeric,
    /// A selection from a fixed choice set, translated to its code on entry.
    Categorical(&'static [Choice]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Stable form/JSON key.
    pub key: &'static str,
    /// Label shown to the user.
    pub label: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn numeric(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Numeric,
        }
    }

    const fn categorical(
        key: &'static str,
        label: &'static str,
        choices: &'static [Choice],
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Categorical(choices),
        }
    }

    /// The configured choices, or an empty slice for numeric fields.
    pub fn choices(&self) -> &'static [Choice] {
        match self.kind {
            FieldKind::Numeric => &[],
            FieldKind::Categorical(choices) => choices,
        }
    }

    /// Look up the code for a displayed choice label.
    pub fn code_for(&self, label: &str) -> Option<f64> {
        self.choices()
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.code)
    }

    /// Look up the displayed label for a code.
    pub fn label_for(&self, code: f64) -> Option<&'static str> {
        self.choices()
            .iter()
            .find(|c| c.code == code)
            .map(|c| c.label)
    }
}

/// The seven supported panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PanelId {
    Diabetes,
    HeartDisease,
    Parkinsons,
    LungCancer,
    Anaemia,
    Hypertension,
    Alzheimers,
}

impl PanelId {
    /// All panels in menu order. The first one is the default page.
    pub const ALL: [PanelId; 7] = [
        PanelId::Diabetes,
        PanelId::HeartDisease,
        PanelId::Parkinsons,
        PanelId::LungCancer,
        PanelId::Anaemia,
        PanelId::Hypertension,
        PanelId::Alzheimers,
    ];

    /// URL slug, also accepted by [`FromStr`].
    pub fn slug(self) -> &'static str {
        match self {
            PanelId::Diabetes => "diabetes",
            PanelId::HeartDisease => "heart-disease",
            PanelId::Parkinsons => "parkinsons",
            PanelId::LungCancer => "lung-cancer",
            PanelId::Anaemia => "anaemia",
            PanelId::Hypertension => "hypertension",
            PanelId::Alzheimers => "alzheimers",
        }
    }

    /// Model file name without extension, e.g. `heart_disease_model`.
    pub fn model_file_stem(self) -> String {
        format!(
            "{}{}",
            self.slug().replace('-', "_"),
            crate::constants::MODEL_FILE_SUFFIX
        )
    }

    pub fn spec(self) -> &'static PanelSpec {
        match self {
            PanelId::Diabetes => &DIABETES,
            PanelId::HeartDisease => &HEART_DISEASE,
            PanelId::Parkinsons => &PARKINSONS,
            PanelId::LungCancer => &LUNG_CANCER,
            PanelId::Anaemia => &ANAEMIA,
            PanelId::Hypertension => &HYPERTENSION,
            PanelId::Alzheimers => &ALZHEIMERS,
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PanelId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown panel: {s}")))
    }
}

/// Static description of one disease panel.
#[derive(Debug)]
pub struct PanelSpec {
    pub id: PanelId,
    /// Page heading.
    pub title: &'static str,
    /// Entry in the selection menu.
    pub menu_label: &'static str,
    /// Menu icon name.
    pub icon: &'static str,
    /// Form grid columns.
    pub columns: u8,
    pub submit_label: &'static str,
    /// Ordered as the classifier's features.
    pub fields: &'static [FieldSpec],
    /// Shown when the classifier returns 1.
    pub positive: &'static str,
    /// Shown for any other label.
    pub negative: &'static str,
}

impl PanelSpec {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn field_index(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.key == key)
    }

    /// Map a classifier label to the diagnosis message.
    pub fn message_for(&self, label: i64) -> &'static str {
        if label == 1 {
            self.positive
        } else {
            self.negative
        }
    }
}

const MALE_FEMALE: &[Choice] = &[
    Choice {
        label: "Male",
        code: 1.0,
    },
    Choice {
        label: "Female",
        code: 0.0,
    },
];

const YES_NO: &[Choice] = &[
    Choice {
        label: "Yes",
        code: 1.0,
    },
    Choice {
        label: "No",
        code: 0.0,
    },
];

const TRUE_FALSE: &[Choice] = &[
    Choice {
        label: "True",
        code: 1.0,
    },
    Choice {
        label: "False",
        code: 0.0,
    },
];

const THALASSEMIA: &[Choice] = &[
    Choice {
        label: "Normal",
        code: 0.0,
    },
    Choice {
        label: "Fixed Defect",
        code: 1.0,
    },
    Choice {
        label: "Reversible Defect",
        code: 2.0,
    },
];

static DIABETES: PanelSpec = PanelSpec {
    id: PanelId::Diabetes,
    title: "Diabetes",
    menu_label: "Diabetes Prediction",
    icon: "activity",
    columns: 3,
    submit_label: "Diabetes Test Result",
    fields: &[
        FieldSpec::numeric("pregnancies", "Number of Pregnancies"),
        FieldSpec::numeric("glucose", "Glucose Level"),
        FieldSpec::numeric("blood_pressure", "Blood Pressure value"),
        FieldSpec::numeric("skin_thickness", "Skin Thickness value"),
        FieldSpec::numeric("insulin", "Insulin Level"),
        FieldSpec::numeric("bmi", "BMI value"),
        FieldSpec::numeric(
            "diabetes_pedigree_function",
            "Diabetes Pedigree Function value",
        ),
        FieldSpec::numeric("age", "Age of the Person"),
    ],
    positive: "The person is diabetic",
    negative: "The person is not diabetic",
};

static HEART_DISEASE: PanelSpec = PanelSpec {
    id: PanelId::HeartDisease,
    title: "Heart Disease",
    menu_label: "Heart Disease Prediction",
    icon: "heart",
    columns: 3,
    submit_label: "Heart Disease Test Result",
    fields: &[
        FieldSpec::numeric("age", "Age"),
        FieldSpec::categorical("sex", "Sex", MALE_FEMALE),
        FieldSpec::numeric("cp", "Chest Pain types"),
        FieldSpec::numeric("trestbps", "Resting Blood Pressure"),
        FieldSpec::numeric("chol", "Serum Cholesterol in mg/dl"),
        FieldSpec::categorical("fbs", "Fasting Blood Sugar > 120 mg/dl", TRUE_FALSE),
        FieldSpec::numeric("restecg", "Resting Electrocardiographic results"),
        FieldSpec::numeric("thalach", "Maximum Heart Rate achieved"),
        FieldSpec::categorical("exang", "Exercise Induced Angina", YES_NO),
        FieldSpec::numeric("oldpeak", "ST depression induced by exercise"),
        FieldSpec::numeric("slope", "Slope of the peak exercise ST segment"),
        FieldSpec::numeric("ca", "Major vessels colored by fluoroscopy"),
        FieldSpec::categorical("thal", "Thalassemia", THALASSEMIA),
    ],
    positive: "The person is having heart disease",
    negative: "The person does not have any heart disease",
};

static PARKINSONS: PanelSpec = PanelSpec {
    id: PanelId::Parkinsons,
    title: "Parkinson's Disease",
    menu_label: "Parkinsons Prediction",
    icon: "person",
    columns: 5,
    submit_label: "Parkinson's Test Result",
    fields: &[
        FieldSpec::numeric("fo", "MDVP:Fo(Hz)"),
        FieldSpec::numeric("fhi", "MDVP:Fhi(Hz)"),
        FieldSpec::numeric("flo", "MDVP:Flo(Hz)"),
        FieldSpec::numeric("jitter_percent", "MDVP:Jitter(%)"),
        FieldSpec::numeric("jitter_abs", "MDVP:Jitter(Abs)"),
        FieldSpec::numeric("rap", "MDVP:RAP"),
        FieldSpec::numeric("ppq", "MDVP:PPQ"),
        FieldSpec::numeric("ddp", "Jitter:DDP"),
        FieldSpec::numeric("shimmer", "MDVP:Shimmer"),
        FieldSpec::numeric("shimmer_db", "MDVP:Shimmer(dB)"),
        FieldSpec::numeric("apq3", "Shimmer:APQ3"),
        FieldSpec::numeric("apq5", "Shimmer:APQ5"),
        FieldSpec::numeric("apq", "MDVP:APQ"),
        FieldSpec::numeric("dda", "Shimmer:DDA"),
        FieldSpec::numeric("nhr", "NHR"),
        FieldSpec::numeric("hnr", "HNR"),
        FieldSpec::numeric("rpde", "RPDE"),
        FieldSpec::numeric("dfa", "DFA"),
        FieldSpec::numeric("spread1", "spread1"),
        FieldSpec::numeric("spread2", "spread2"),
        FieldSpec::numeric("d2", "D2"),
        FieldSpec::numeric("ppe", "PPE"),
    ],
    positive: "The person has Parkinson's disease",
    negative: "The person does not have Parkinson's disease",
};

static LUNG_CANCER: PanelSpec = PanelSpec {
    id: PanelId::LungCancer,
    title: "Lung Cancer",
    menu_label: "Lung Cancer Prediction",
    icon: "lungs",
    columns: 3,
    submit_label: "Lung Cancer Test Result",
    fields: &[
        FieldSpec::categorical("gender", "Gender", MALE_FEMALE),
        FieldSpec::numeric("age", "Age"),
        FieldSpec::categorical("smoking", "Smoking", YES_NO),
        FieldSpec::numeric("yellow_fingers", "Yellow Fingers"),
        FieldSpec::numeric("anxiety", "Anxiety"),
        FieldSpec::numeric("peer_pressure", "Peer Pressure"),
        FieldSpec::numeric("chronic_disease", "Chronic Disease"),
        FieldSpec::numeric("fatigue", "Fatigue"),
        FieldSpec::numeric("allergy", "Allergy"),
        FieldSpec::numeric("wheezing", "Wheezing"),
        FieldSpec::numeric("alcohol_consuming", "Alcohol Consuming"),
        FieldSpec::numeric("coughing", "Coughing"),
        FieldSpec::numeric("shortness_of_breath", "Shortness of Breath"),
        FieldSpec::numeric("swallowing_difficulty", "Swallowing Difficulty"),
        FieldSpec::numeric("chest_pain", "Chest Pain"),
    ],
    positive: "The person has lung cancer",
    negative: "The person does not have lung cancer",
};

static ANAEMIA: PanelSpec = PanelSpec {
    id: PanelId::Anaemia,
    title: "Anaemia Prediction",
    menu_label: "Anaemia Prediction",
    icon: "droplet",
    columns: 2,
    submit_label: "Anaemia Test Result",
    fields: &[
        FieldSpec::categorical("gender", "Gender", MALE_FEMALE),
        FieldSpec::numeric("hemoglobin", "Hemoglobin Level"),
        FieldSpec::numeric("mch", "Mean Corpuscular Hemoglobin (MCH)"),
        FieldSpec::numeric(
            "mchc",
            "Mean Corpuscular Hemoglobin Concentration (MCHC)",
        ),
        FieldSpec::numeric("mcv", "Mean Corpuscular Volume (MCV)"),
    ],
    positive: "The person has anaemia",
    negative: "The person does not have anaemia",
};

static HYPERTENSION: PanelSpec = PanelSpec {
    id: PanelId::Hypertension,
    title: "Hypertension",
    menu_label: "Hypertension Prediction",
    icon: "speedometer",
    columns: 3,
    submit_label: "Hypertension Test Result",
    fields: &[
        FieldSpec::categorical("gender", "Gender", MALE_FEMALE),
        FieldSpec::numeric("age", "Age"),
        FieldSpec::categorical("current_smoker", "Current Smoker", YES_NO),
        FieldSpec::numeric("cigs_per_day", "Cigarettes per Day"),
        FieldSpec::categorical("bp_meds", "On Blood Pressure Medication", YES_NO),
        FieldSpec::categorical("diabetes", "Diabetes", YES_NO),
        FieldSpec::numeric("tot_chol", "Total Cholesterol"),
        FieldSpec::numeric("sys_bp", "Systolic Blood Pressure"),
        FieldSpec::numeric("dia_bp", "Diastolic Blood Pressure"),
        FieldSpec::numeric("bmi", "BMI value"),
        FieldSpec::numeric("heart_rate", "Heart Rate"),
        FieldSpec::numeric("glucose", "Glucose Level"),
    ],
    positive: "The person has hypertension",
    negative: "The person does not have hypertension",
};

static ALZHEIMERS: PanelSpec = PanelSpec {
    id: PanelId::Alzheimers,
    title: "Alzheimer's Disease",
    menu_label: "Alzheimers Prediction",
    icon: "cpu",
    columns: 3,
    submit_label: "Alzheimer's Test Result",
    fields: &[
        FieldSpec::categorical("gender", "Gender", MALE_FEMALE),
        FieldSpec::numeric("age", "Age"),
        FieldSpec::numeric("educ", "Years of Education"),
        FieldSpec::numeric("ses", "Socioeconomic Status"),
        FieldSpec::numeric("mmse", "Mini Mental State Examination score"),
        FieldSpec::numeric("etiv", "Estimated Total Intracranial Volume"),
        FieldSpec::numeric("nwbv", "Normalized Whole Brain Volume"),
        FieldSpec::numeric("asf", "Atlas Scaling Factor"),
    ],
    positive: "The person has Alzheimer's disease",
    negative: "The person does not have Alzheimer's disease",
};
