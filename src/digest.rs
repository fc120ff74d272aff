use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::model::{LeaveField, LeaveRecord};

/// One labelled line of a record block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestLine {
    pub field: DigestField,
    pub label: String,
}

/// Fields a digest may print. The teacher email is implied by the recipient.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigestField {
    StudentId,
    StudentName,
    StudentEmail,
    StudentDept,
    CourseName,
    ClassTime,
    ClassCampus,
    ClassRoom,
}

impl From<DigestField> for LeaveField {
    fn from(field: DigestField) -> Self {
        match field {
            DigestField::StudentId => LeaveField::StudentId,
            DigestField::StudentName => LeaveField::StudentName,
            DigestField::StudentEmail => LeaveField::StudentEmail,
            DigestField::StudentDept => LeaveField::StudentDept,
            DigestField::CourseName => LeaveField::CourseName,
            DigestField::ClassTime => LeaveField::ClassTime,
            DigestField::ClassCampus => LeaveField::ClassCampus,
            DigestField::ClassRoom => LeaveField::ClassRoom,
        }
    }
}

/// Text around and inside the per-teacher digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestTemplate {
    pub greeting: String,
    pub bullet: String,
    pub lines: Vec<DigestLine>,
    pub closing: String,
}

impl Default for DigestTemplate {
    fn default() -> Self {
        let line = |field, label: &str| DigestLine {
            field,
            label: label.to_string(),
        };

        Self {
            greeting: "老師您好,\n\n以下為您目前開課的學生請假名單，請查閱:\n".into(),
            bullet: "·".into(),
            lines: vec![
                line(DigestField::StudentId, "學號"),
                line(DigestField::StudentName, "姓名"),
                line(DigestField::StudentEmail, "學生信箱"),
                line(DigestField::StudentDept, "學生系所"),
                line(DigestField::CourseName, "課程名稱"),
                line(DigestField::ClassTime, "上課時間"),
                line(DigestField::ClassCampus, "上課校區"),
                line(DigestField::ClassRoom, "上課教室"),
            ],
            closing: "如有問題，煩請老師寫信告知詢問!\n\n感謝您,\n送信鳥擇像發信系統團隊".into(),
        }
    }
}

impl DigestTemplate {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            AppError::Config(format!("invalid digest template in {}: {e}", path.display()))
        })
    }

    /// Renders the greeting, one block per record in input order, then the closing.
    pub fn compose(&self, records: &[LeaveRecord]) -> String {
        let mut body = self.greeting.clone();

        for record in records {
            for line in &self.lines {
                body.push_str(&self.bullet);
                body.push_str(&line.label);
                body.push(':');
                body.push_str(record.field(line.field.into()));
                body.push('\n');
            }
            body.push('\n');
        }

        body.push_str(&self.closing);
        body
    }
}

/// [`DigestTemplate::compose`] with the default template.
pub fn compose(records: &[LeaveRecord]) -> String {
    DigestTemplate::default().compose(records)
}
