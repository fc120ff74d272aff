use std::path::Path;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::{AppError, Result};

/// The nine business columns every import row must carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LeaveField {
    StudentId,
    StudentName,
    StudentEmail,
    StudentDept,
    CourseName,
    ClassCampus,
    ClassRoom,
    ClassTime,
    TeacherEmail,
}

/// Header text expected in the spreadsheet for each [`LeaveField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLabels {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub student_dept: String,
    pub course_name: String,
    pub class_campus: String,
    pub class_room: String,
    pub class_time: String,
    pub teacher_email: String,
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            student_id: "學號".into(),
            student_name: "姓名".into(),
            student_email: "學生信箱".into(),
            student_dept: "學生班級".into(),
            course_name: "科目".into(),
            class_campus: "上課校區".into(),
            class_room: "上課教室".into(),
            class_time: "上課時間".into(),
            teacher_email: "授課教師信箱".into(),
        }
    }
}

impl ColumnLabels {
    pub fn label(&self, field: LeaveField) -> &str {
        match field {
            LeaveField::StudentId => &self.student_id,
            LeaveField::StudentName => &self.student_name,
            LeaveField::StudentEmail => &self.student_email,
            LeaveField::StudentDept => &self.student_dept,
            LeaveField::CourseName => &self.course_name,
            LeaveField::ClassCampus => &self.class_campus,
            LeaveField::ClassRoom => &self.class_room,
            LeaveField::ClassTime => &self.class_time,
            LeaveField::TeacherEmail => &self.teacher_email,
        }
    }

    /// Loads a label set from a JSON object keyed by field name. Absent keys keep their default.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            AppError::Config(format!("invalid column labels in {}: {e}", path.display()))
        })
    }
}
