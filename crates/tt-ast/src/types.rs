//! The narrow slice of the ThingTalk type system this crate needs: just
//! enough to carry a function's declared argument types so the compiler and
//! parser can look them up. Full type inference, schema loading from
//! Thingpedia, and general type-compatibility checks are out of scope (spec
//! §1) -- every [`FunctionSignature`] here is assumed already resolved by
//! the caller.

/// A ThingTalk value type, as carried on a function parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ThingTalkType {
    String,
    Number,
    Boolean,
    Date,
    Time,
    Currency,
    Location,
    Entity(String),
    Measure(String),
    Enum(Vec<String>),
    Array(Box<ThingTalkType>),
    RecurrentTimeSpecification,
    Any,
}

impl std::fmt::Display for ThingTalkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThingTalkType::String => write!(f, "String"),
            ThingTalkType::Number => write!(f, "Number"),
            ThingTalkType::Boolean => write!(f, "Boolean"),
            ThingTalkType::Date => write!(f, "Date"),
            ThingTalkType::Time => write!(f, "Time"),
            ThingTalkType::Currency => write!(f, "Currency"),
            ThingTalkType::Location => write!(f, "Location"),
            ThingTalkType::Entity(t) => write!(f, "Entity({t})"),
            ThingTalkType::Measure(u) => write!(f, "Measure({u})"),
            ThingTalkType::Enum(vals) => write!(f, "Enum({})", vals.join(",")),
            ThingTalkType::Array(inner) => write!(f, "Array({inner})"),
            ThingTalkType::RecurrentTimeSpecification => write!(f, "RecurrentTimeSpecification"),
            ThingTalkType::Any => write!(f, "Any"),
        }
    }
}

/// The subset of a Thingpedia function signature the serializer needs:
/// enough argument name/type pairs to resolve `param:<name>` references and
/// decide whether a measure/enum value needs a type annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub kind: String,
    pub channel: String,
    pub args: Vec<(String, ThingTalkType)>,
    pub is_list: bool,
    pub is_monitorable: bool,
}

impl FunctionSignature {
    pub fn arg_type(&self, name: &str) -> Option<&ThingTalkType> {
        self.args.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}
