//! People who owe money, their running totals and the pages for managing them.

mod create;
mod db;
mod delete;
mod detail;
mod domain;
mod edit;
mod list;

pub use create::{create_person_endpoint, get_new_person_page};
pub use db::{
    count_transactions_per_person, create_person, create_person_table, delete_person,
    get_all_people, get_person, rename_person,
};
pub use delete::delete_person_endpoint;
pub use detail::get_person_page;
pub use domain::{Person, PersonFormData, PersonId, PersonName};
pub use edit::{get_edit_person_page, rename_person_endpoint};
pub use list::get_people_page;
