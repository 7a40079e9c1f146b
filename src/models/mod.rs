pub mod academic_session;
pub mod audit_log;
pub mod fee_payment;
pub mod fee_structure;
pub mod grade_scale;
pub mod homework;
pub mod ledger;
pub mod notice;
pub mod notice_read;
pub mod school;
pub mod school_class;
pub mod section;
pub mod student;
pub mod student_attendance;
pub mod student_enrollment;
pub mod student_fee;
pub mod student_mark;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::academic_session::{self, Entity as AcademicSession};
    pub use super::audit_log::{self, Entity as AuditLog};
    pub use super::fee_payment::{self, Entity as FeePayment};
    pub use super::fee_structure::{self, Entity as FeeStructure};
    pub use super::grade_scale::{self, Entity as GradeScale};
    pub use super::homework::{self, Entity as Homework};
    pub use super::ledger::{self, Entity as Ledger};
    pub use super::notice::{self, Entity as Notice};
    pub use super::notice_read::{self, Entity as NoticeRead};
    pub use super::school::{self, Entity as School};
    pub use super::school_class::{self, Entity as SchoolClass};
    pub use super::section::{self, Entity as Section};
    pub use super::student::{self, Entity as Student};
    pub use super::student_attendance::{self, Entity as StudentAttendance};
    pub use super::student_enrollment::{self, Entity as StudentEnrollment};
    pub use super::student_fee::{self, Entity as StudentFee};
    pub use super::student_mark::{self, Entity as StudentMark};
    pub use super::user::{self, Entity as User};
}
