use serde::Serialize;

use crate::error::PortalError;
use crate::records::{ClassInfo, ClassTab};

/// Lecturer class-detail page: the selected class plus the active tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassShell {
    pub class: ClassInfo,
    pub active_tab: ClassTab,
}

impl ClassShell {
    pub fn open(classes: &[ClassInfo], class_id: &str) -> Result<Self, PortalError> {
        let class = classes
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
            .ok_or_else(|| PortalError::not_found("class", class_id))?;
        Ok(Self {
            class,
            active_tab: ClassTab::Announcements,
        })
    }

    pub fn select_tab(&mut self, raw: &str) -> Result<ClassTab, PortalError> {
        let tab = ClassTab::parse(raw)
            .ok_or_else(|| PortalError::validation("tab", format!("unknown tab '{raw}'")))?;
        self.active_tab = tab;
        Ok(tab)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let tabs: Vec<serde_json::Value> = ClassTab::ALL
            .iter()
            .map(|t| {
                serde_json::json!({
                    "tab": t.as_str(),
                    "active": *t == self.active_tab,
                })
            })
            .collect();
        serde_json::json!({
            "class": self.class,
            "activeTab": self.active_tab,
            "tabs": tabs,
        })
    }
}
