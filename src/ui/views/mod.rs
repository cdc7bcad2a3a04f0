mod employees;

pub use employees::EmployeesView;
