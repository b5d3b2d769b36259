use super::Field;

/// One form of the schema: a titled, ordered list of top-level fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub form_id: String,
    pub title: String,
    pub fields: Vec<Field>,
}

impl Form {
    /// Visits every field of the form, descending into groups, in schema order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Field)) {
        for field in &self.fields {
            field.walk(visit);
        }
    }

    /// Finds a field anywhere in the tree by its id.
    pub fn find_field(&self, id: &str) -> Option<&Field> {
        let mut found = None;
        self.walk(&mut |field| {
            if found.is_none() && field.id == id {
                found = Some(field);
            }
        });
        found
    }
}
