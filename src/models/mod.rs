pub mod course;
pub mod report;

pub use course::{Course, CourseStatus, Enrollment, Lesson, Rating, Section};
pub use report::{
    CourseAnalytics, GamificationSnapshot, Report, TeacherOverview,
};
