/// Field names as reported in validation errors and problem pointers.
pub struct ContactFieldNames;

impl ContactFieldNames {
    pub const ID: &'static str = "contact_id";
    pub const NAME: &'static str = "name";
    pub const SURNAME: &'static str = "surname";
    pub const EMAIL: &'static str = "email";
    pub const NUMBER: &'static str = "number";
    pub const BIRTHDAY: &'static str = "birthday";
    pub const DESCRIPTION: &'static str = "description";
    pub const LIMIT: &'static str = "limit";
    pub const OFFSET: &'static str = "offset";
}
