mod column_picker;
mod command_input;
mod employee_table;
mod input;
mod key_result;
mod row_menu;
mod search_input;

pub use column_picker::{ColumnEntry, ColumnPicker, ColumnPickerEvent};
pub use command_input::{CommandEvent, CommandInput};
pub use employee_table::{render_error, EmployeeGrid, SKELETON_ROWS};
pub use input::{InputResult, TextInput};
pub use key_result::KeyResult;
pub use row_menu::RowMenu;
pub use search_input::{SearchEvent, SearchInput};
