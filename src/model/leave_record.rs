use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::model::field::LeaveField;

/// One student absence for one course, as stored in `leave_requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LeaveRecord {
    #[sqlx(rename = "lr_id")]
    pub id: String,
    pub student_id: String,
    #[sqlx(rename = "s_name")]
    pub student_name: String,
    #[sqlx(rename = "s_email")]
    pub student_email: String,
    #[sqlx(rename = "s_dept")]
    pub student_dept: String,
    pub course_name: String,
    pub class_room: String,
    pub class_time: String,
    pub class_campus: String,
    #[sqlx(rename = "t_email")]
    pub teacher_email: String,
}

/// A record read from an import, before the store assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLeaveRecord {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    pub student_dept: String,
    pub course_name: String,
    pub class_room: String,
    pub class_time: String,
    pub class_campus: String,
    pub teacher_email: String,
}

impl NewLeaveRecord {
    pub fn set(&mut self, field: LeaveField, value: String) {
        match field {
            LeaveField::StudentId => self.student_id = value,
            LeaveField::StudentName => self.student_name = value,
            LeaveField::StudentEmail => self.student_email = value,
            LeaveField::StudentDept => self.student_dept = value,
            LeaveField::CourseName => self.course_name = value,
            LeaveField::ClassCampus => self.class_campus = value,
            LeaveField::ClassRoom => self.class_room = value,
            LeaveField::ClassTime => self.class_time = value,
            LeaveField::TeacherEmail => self.teacher_email = value,
        }
    }

    pub fn with_id(self, id: String) -> LeaveRecord {
        LeaveRecord {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            student_email: self.student_email,
            student_dept: self.student_dept,
            course_name: self.course_name,
            class_room: self.class_room,
            class_time: self.class_time,
            class_campus: self.class_campus,
            teacher_email: self.teacher_email,
        }
    }
}

impl LeaveRecord {
    pub fn field(&self, field: LeaveField) -> &str {
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
}
