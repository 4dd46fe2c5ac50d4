mod tables;

pub use self::tables::{
    designs as print_designs, drive_solutions as print_drive_solutions,
    history as print_history, issues as print_issues,
};
