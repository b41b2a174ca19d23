use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{require_text, PortalError};
use crate::listview::ListRecord;

/// Closed set of display labels with case-insensitive parsing. The label is
/// the wire and storage form.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn parse(raw: &str) -> Option<Self> {
                let t = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(t))
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(d)?;
                Self::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {}: {}", stringify!($name), raw))
                })
            }
        }
    };
}

labeled_enum!(AnnouncementCategory {
    General => "General",
    Academic => "Academic",
    Event => "Event",
    Urgent => "Urgent",
});

labeled_enum!(ResourceCategory {
    LectureNotes => "Lecture Notes",
    Assignments => "Assignments",
    Readings => "Readings",
    Videos => "Videos",
});

labeled_enum!(
    /// Only selects the icon/label a front-end shows.
    ResourceType {
        Pdf => "pdf",
        Video => "video",
        Link => "link",
        Document => "document",
    }
);

labeled_enum!(GradeCategory {
    Assignment => "Assignment",
    Quiz => "Quiz",
    Exam => "Exam",
    Project => "Project",
});

labeled_enum!(ClassTab {
    Announcements => "announcements",
    Resources => "resources",
    Grades => "grades",
});

fn parse_required<T>(
    field: &'static str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<T, PortalError> {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return Err(PortalError::validation(field, "is required"));
    };
    parse(raw).ok_or_else(|| PortalError::validation(field, format!("unknown value '{raw}'")))
}

fn required_text(field: &'static str, value: String) -> Result<String, PortalError> {
    require_text(field, &value)?;
    Ok(value.trim().to_string())
}

fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// A file picked in a create form. Only the reference is kept; nothing is
/// uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Attachment {
    pub fn validate(&self) -> Result<(), PortalError> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: AnnouncementCategory,
    pub date: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub pinned: Option<bool>,
}

impl ListRecord for Announcement {
    const KIND: &'static str = "announcement";
    const DATE_SORTED: bool = true;

    type Draft = AnnouncementDraft;
    type Patch = AnnouncementPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.content.as_str(), self.author.as_str()]
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn from_draft(id: String, draft: AnnouncementDraft) -> Result<Self, PortalError> {
        Ok(Self {
            id,
            title: required_text("title", draft.title)?,
            content: required_text("content", draft.content)?,
            author: draft
                .author
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Lecturer".to_string()),
            category: parse_required(
                "category",
                draft.category.as_deref(),
                AnnouncementCategory::parse,
            )?,
            date: draft.date.unwrap_or_else(now_stamp),
            pinned: draft.pinned,
        })
    }

    fn apply_patch(&mut self, patch: AnnouncementPatch) -> Result<(), PortalError> {
        if let Some(v) = patch.title {
            self.title = required_text("title", v)?;
        }
        if let Some(v) = patch.content {
            self.content = required_text("content", v)?;
        }
        if let Some(v) = patch.author {
            self.author = required_text("author", v)?;
        }
        if let Some(v) = patch.category {
            self.category =
                parse_required("category", Some(v.as_str()), AnnouncementCategory::parse)?;
        }
        if let Some(v) = patch.date {
            self.date = required_text("date", v)?;
        }
        if let Some(v) = patch.pinned {
            self.pinned = v;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub date: String,
    #[serde(default)]
    pub files: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceDraft {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub files: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
}

impl ListRecord for Resource {
    const KIND: &'static str = "resource";
    const DATE_SORTED: bool = true;

    type Draft = ResourceDraft;
    type Patch = ResourcePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn from_draft(id: String, draft: ResourceDraft) -> Result<Self, PortalError> {
        for f in &draft.files {
            f.validate()?;
        }
        let kind = match draft.kind.as_deref() {
            None => ResourceType::Document,
            Some(raw) => parse_required("type", Some(raw), ResourceType::parse)?,
        };
        Ok(Self {
            id,
            title: required_text("title", draft.title)?,
            description: draft.description.trim().to_string(),
            category: parse_required(
                "category",
                draft.category.as_deref(),
                ResourceCategory::parse,
            )?,
            kind,
            date: draft.date.unwrap_or_else(now_stamp),
            files: draft.files,
        })
    }

    fn apply_patch(&mut self, patch: ResourcePatch) -> Result<(), PortalError> {
        if let Some(v) = patch.title {
            self.title = required_text("title", v)?;
        }
        if let Some(v) = patch.description {
            self.description = v.trim().to_string();
        }
        if let Some(v) = patch.category {
            self.category = parse_required("category", Some(v.as_str()), ResourceCategory::parse)?;
        }
        if let Some(v) = patch.kind {
            self.kind = parse_required("type", Some(v.as_str()), ResourceType::parse)?;
        }
        if let Some(v) = patch.date {
            self.date = required_text("date", v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub title: String,
    pub category: GradeCategory,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeDraft {
    pub title: String,
    pub category: Option<String>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradePatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    pub percentage: Option<f64>,
    pub date: Option<String>,
}

fn check_score(score: f64, max_score: f64) -> Result<(), PortalError> {
    if !score.is_finite() || score < 0.0 {
        return Err(PortalError::validation("score", "must be a number >= 0"));
    }
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err(PortalError::validation("maxScore", "must be a number > 0"));
    }
    Ok(())
}

fn check_percentage(percentage: f64) -> Result<(), PortalError> {
    if !percentage.is_finite() || percentage < 0.0 {
        return Err(PortalError::validation("percentage", "must be a number >= 0"));
    }
    Ok(())
}

impl ListRecord for Grade {
    const KIND: &'static str = "grade";
    // Grades are listed in the order they were recorded.
    const DATE_SORTED: bool = false;

    type Draft = GradeDraft;
    type Patch = GradePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str()]
    }

    fn date(&self) -> Option<&str> {
        Some(&self.date)
    }

    fn from_draft(id: String, draft: GradeDraft) -> Result<Self, PortalError> {
        let title = required_text("title", draft.title)?;
        let category =
            parse_required("category", draft.category.as_deref(), GradeCategory::parse)?;
        let score = draft
            .score
            .ok_or_else(|| PortalError::validation("score", "is required"))?;
        let max_score = draft
            .max_score
            .ok_or_else(|| PortalError::validation("maxScore", "is required"))?;
        let percentage = draft
            .percentage
            .ok_or_else(|| PortalError::validation("percentage", "is required"))?;
        check_score(score, max_score)?;
        check_percentage(percentage)?;
        Ok(Self {
            id,
            title,
            category,
            score,
            max_score,
            percentage,
            date: draft.date.unwrap_or_else(now_stamp),
        })
    }

    fn apply_patch(&mut self, patch: GradePatch) -> Result<(), PortalError> {
        let score = patch.score.unwrap_or(self.score);
        let max_score = patch.max_score.unwrap_or(self.max_score);
        let percentage = patch.percentage.unwrap_or(self.percentage);
        check_score(score, max_score)?;
        check_percentage(percentage)?;
        if let Some(v) = patch.title {
            self.title = required_text("title", v)?;
        }
        if let Some(v) = patch.category {
            self.category = parse_required("category", Some(v.as_str()), GradeCategory::parse)?;
        }
        if let Some(v) = patch.date {
            self.date = required_text("date", v)?;
        }
        self.score = score;
        self.max_score = max_score;
        self.percentage = percentage;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub id: String,
    pub code: String,
    pub name: String,
    pub lecturer: String,
    pub schedule: String,
    pub room: String,
}
