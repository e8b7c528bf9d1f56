pub mod department;
pub mod json_column;
pub mod laboratory;
pub mod product;
pub mod service;
pub mod service_center;
pub mod staff;
pub mod user;

pub use department::DepartmentRow;
pub use json_column::JsonColumn;
pub use laboratory::LaboratoryRow;
pub use product::ProductRow;
pub use service::ServiceRow;
pub use service_center::ServiceCenterRow;
pub use staff::{StaffLaboratoryRow, StaffRow};
pub use user::User;
