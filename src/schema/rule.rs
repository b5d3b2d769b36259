use std::fmt;

/// The comparison a visibility rule applies to its controlling answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    NotContains,
    Exists,
    NotExists,
    /// A condition name the engine does not understand. Always evaluates to `false`.
    Unknown(String),
}

impl Condition {
    /// Maps a wire name (e.g. `"greaterThanOrEqual"`) onto a condition.
    /// Unrecognized names are kept as `Condition::Unknown`.
    pub fn parse(name: &str) -> Self {
        match name {
            "equals" => Condition::Equals,
            "notEquals" => Condition::NotEquals,
            "greaterThan" => Condition::GreaterThan,
            "lessThan" => Condition::LessThan,
            "greaterThanOrEqual" => Condition::GreaterThanOrEqual,
            "lessThanOrEqual" => Condition::LessThanOrEqual,
            "contains" => Condition::Contains,
            "notContains" => Condition::NotContains,
            "exists" => Condition::Exists,
            "notExists" => Condition::NotExists,
            other => Condition::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Condition::Equals => "equals",
            Condition::NotEquals => "notEquals",
            Condition::GreaterThan => "greaterThan",
            Condition::LessThan => "lessThan",
            Condition::GreaterThanOrEqual => "greaterThanOrEqual",
            Condition::LessThanOrEqual => "lessThanOrEqual",
            Condition::Contains => "contains",
            Condition::NotContains => "notContains",
            Condition::Exists => "exists",
            Condition::NotExists => "notExists",
            Condition::Unknown(name) => name,
        }
    }

    /// Operator symbol used when explaining an evaluation.
    pub fn symbol(&self) -> &'static str {
        match self {
            Condition::Equals => "==",
            Condition::NotEquals => "!=",
            Condition::GreaterThan => ">",
            Condition::LessThan => "<",
            Condition::GreaterThanOrEqual => ">=",
            Condition::LessThanOrEqual => "<=",
            Condition::Contains => "CONTAINS",
            Condition::NotContains => "NOT CONTAINS",
            Condition::Exists => "EXISTS",
            Condition::NotExists => "NOT EXISTS",
            Condition::Unknown(_) => "?",
        }
    }

    /// Whether the condition compares against the rule's operand at all.
    pub fn uses_operand(&self) -> bool {
        !matches!(self, Condition::Exists | Condition::NotExists)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A visibility rule: `answers[depends_on] <condition> value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub depends_on: String,
    pub condition: Condition,
    /// The operand in string form. `None` when the schema omitted it; every
    /// condition that needs an operand then evaluates to `false`.
    pub value: Option<String>,
}

impl Rule {
    pub fn new(depends_on: &str, condition: Condition, value: &str) -> Self {
        Self {
            depends_on: depends_on.to_string(),
            condition,
            value: Some(value.to_string()),
        }
    }

    /// A rule without an operand, e.g. `exists`.
    pub fn presence(depends_on: &str, condition: Condition) -> Self {
        Self {
            depends_on: depends_on.to_string(),
            condition,
            value: None,
        }
    }
}
