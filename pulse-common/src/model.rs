//! Domain model types
//!
//! Wire format is camelCase with SCREAMING_SNAKE_CASE enums, matching the
//! payloads the Pulse frontend consumes. Answer values are arbitrary JSON
//! (`serde_json::Value`): null, bool, number, text, or array.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Question answer kind. MULTIPLE_CHOICE is single-select, CHECKBOX multi-select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    Text,
    Number,
    MultipleChoice,
    Checkbox,
    Scale,
    FileUpload,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Text => "TEXT",
            QuestionType::Number => "NUMBER",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
            QuestionType::Checkbox => "CHECKBOX",
            QuestionType::Scale => "SCALE",
            QuestionType::FileUpload => "FILE_UPLOAD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "TEXT" => Some(QuestionType::Text),
            "NUMBER" => Some(QuestionType::Number),
            "MULTIPLE_CHOICE" => Some(QuestionType::MultipleChoice),
            "CHECKBOX" => Some(QuestionType::Checkbox),
            "SCALE" => Some(QuestionType::Scale),
            "FILE_UPLOAD" => Some(QuestionType::FileUpload),
            _ => None,
        }
    }
}

/// Campaign lifecycle state. Transitions: CREATED -> PUBLISHED -> CLOSED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Created,
    Published,
    Closed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Created => "CREATED",
            CampaignStatus::Published => "PUBLISHED",
            CampaignStatus::Closed => "CLOSED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(CampaignStatus::Created),
            "PUBLISHED" => Some(CampaignStatus::Published),
            "CLOSED" => Some(CampaignStatus::Closed),
            _ => None,
        }
    }
}

/// Comparison operator in a visibility condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisibilityOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
}

/// One comparison rule contributing to a question's AND-combined visibility.
///
/// `question_code` must reference a question with a strictly smaller order
/// index in the same survey version; this is enforced at authoring time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityCondition {
    pub question_code: String,
    pub operator: VisibilityOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Per-question validation rules. Consumed by answer validation; opaque here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_extensions: Option<Vec<String>>,
}

/// Selectable option for choice questions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

/// A question inside one survey version.
///
/// Immutable once a campaign bound to the owning version has begun
/// collecting responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<ValidationRules>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub visibility_conditions: Vec<VisibilityCondition>,
}

impl Question {
    /// Stable key used by skip logic. Falls back to the question id when
    /// no author-assigned code exists.
    pub fn effective_code(&self) -> String {
        match &self.code {
            Some(code) if !code.is_empty() => code.clone(),
            _ => self.id.to_string(),
        }
    }
}

/// An immutable, ordered snapshot of questions belonging to a survey
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyVersion {
    pub id: Uuid,
    pub survey_id: Uuid,
    pub version_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_log: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions_count: Option<i64>,
}

/// Reusable question set. Applying a template creates a new survey whose
/// first version carries the template's questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<TemplateQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Question as stored inside a template (no id yet; ids are assigned when
/// the template is applied to create a survey version).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuestion {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rules: Option<ValidationRules>,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub visibility_conditions: Vec<VisibilityCondition>,
}

/// A time-boxed publication of one survey version to respondents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: CampaignStatus,
    pub survey_version_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One stored answer within a response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseItem {
    pub id: Uuid,
    pub question_id: Uuid,
    pub value: Value,
}

/// A persisted submission for one campaign.
///
/// `user_id` and `anonymous_id` may both be present; the authenticated
/// identity wins for the one-submission-per-respondent rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: Uuid,
    pub campaign_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time_seconds: Option<i64>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<ResponseItem>,
}
