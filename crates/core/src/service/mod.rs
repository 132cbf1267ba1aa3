mod department;
mod employee;

pub use department::DepartmentService;
pub use employee::EmployeeService;
