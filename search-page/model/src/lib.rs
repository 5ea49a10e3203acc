pub mod page;
pub mod search;

pub mod prelude {
    pub use crate::page::*;
    pub use crate::search::*;
}
