//! Query Language Abstract Syntax Tree (AST)
//!
//! The types and fields here resemble official [graphql grammar] whenever it
//! makes sense for rust. Names are owned strings so a parsed document can be
//! edited and printed again.
//!
//! [graphql grammar]: http://facebook.github.io/graphql/October2016/#sec-Appendix-Grammar-Summary
//!
pub use crate::common::{Directive, Txt, Type, Value};
use crate::position::Pos;

/// Root of query data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    SelectionSet(SelectionSet),
    Operation(OperationDefinition),
    Fragment(FragmentDefinition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDefinition {
    pub position: Pos,
    pub name: Txt,
    pub type_condition: Txt,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDefinition {
    pub position: Pos,
    pub kind: Operation,
    pub name: Option<Txt>,
    pub variable_definitions: Vec<VariableDefinition>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}

impl OperationDefinition {
    /// An anonymous operation with an empty selection set
    pub fn new(kind: Operation) -> Self {
        OperationDefinition {
            position: Pos::default(),
            kind,
            name: None,
            variable_definitions: Vec::new(),
            directives: Vec::new(),
            selection_set: SelectionSet::default(),
        }
    }

    /// Promotes a `{ ... }` shorthand to a full query operation
    pub fn from_shorthand(selection_set: SelectionSet) -> Self {
        OperationDefinition {
            position: selection_set.span.0,
            selection_set,
            ..OperationDefinition::new(Operation::Query)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Query,
    Mutation,
    Subscription,
}

impl Operation {
    /// Returns GraphQL syntax compatible name of the operation
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    pub span: (Pos, Pos),
    pub items: Vec<Selection>,
}

impl SelectionSet {
    /// The first field selection with the given field name, ignoring aliases
    pub fn field_position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| match item {
            Selection::Field(field) => field.name == name,
            _ => false,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.field_position(name).and_then(|idx| match &self.items[idx] {
            Selection::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.items.iter().filter_map(|item| match item {
            Selection::Field(field) => Some(field),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDefinition {
    pub position: Pos,
    pub name: Txt,
    pub var_type: Type,
    pub default_value: Option<Value>,
}

impl VariableDefinition {
    pub fn new(name: Txt, var_type: Type) -> Self {
        VariableDefinition {
            position: Pos::default(),
            name,
            var_type,
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub position: Pos,
    pub alias: Option<Txt>,
    pub name: Txt,
    pub arguments: Vec<(Txt, Value)>,
    pub directives: Vec<Directive>,
    /// `None` for a leaf field, `Some` (possibly empty) when braces follow
    pub selection_set: Option<SelectionSet>,
}

impl Field {
    pub fn new(name: Txt) -> Self {
        Field {
            position: Pos::default(),
            alias: None,
            name,
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: None,
        }
    }

    /// The key this field occupies in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentSpread {
    pub position: Pos,
    pub fragment_name: Txt,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub position: Pos,
    pub type_condition: Option<Txt>,
    pub directives: Vec<Directive>,
    pub selection_set: SelectionSet,
}
