use std::fmt;

use crate::format::{format_arguments, format_directives, Displayable, Formatter, Style};

use crate::query::ast::*;

impl Document {
    /// Format a document according to style
    pub fn format(&self, style: &Style) -> String {
        let mut formatter = Formatter::new(style);
        self.display(&mut formatter);
        formatter.into_string()
    }
}

fn to_string<T: Displayable>(v: &T) -> String {
    let style = Style::default();
    let mut formatter = Formatter::new(&style);
    v.display(&mut formatter);
    formatter.into_string()
}

fn format_selections(set: &SelectionSet, f: &mut Formatter) {
    if set.items.is_empty() {
        f.empty_block();
        return;
    }
    f.start_block();
    for item in &set.items {
        item.display(f);
    }
    f.end_block();
}

impl Displayable for Document {
    fn display(&self, f: &mut Formatter) {
        for item in &self.definitions {
            item.display(f);
        }
    }
}

impl Displayable for Definition {
    fn display(&self, f: &mut Formatter) {
        match *self {
            Definition::SelectionSet(ref s) => s.display(f),
            Definition::Operation(ref op) => op.display(f),
            Definition::Fragment(ref frag) => frag.display(f),
        }
    }
}

impl Displayable for FragmentDefinition {
    fn display(&self, f: &mut Formatter) {
        f.margin();
        f.indent();
        f.write("fragment");
        f.space();
        f.write(&self.name);
        f.space();
        f.write("on");
        f.space();
        f.write(&self.type_condition);
        format_directives(&self.directives, f);
        f.space();
        format_selections(&self.selection_set, f);
    }
}

impl Displayable for SelectionSet {
    fn display(&self, f: &mut Formatter) {
        f.margin();
        f.indent();
        format_selections(self, f);
    }
}

impl Displayable for Selection {
    fn display(&self, f: &mut Formatter) {
        match *self {
            Selection::Field(ref fld) => fld.display(f),
            Selection::InlineFragment(ref frag) => frag.display(f),
            Selection::FragmentSpread(ref frag) => frag.display(f),
        }
    }
}

impl Displayable for Field {
    fn display(&self, f: &mut Formatter) {
        f.indent();
        if let Some(ref alias) = self.alias {
            f.write(alias);
            f.write(":");
            f.space();
        }
        f.write(&self.name);
        format_arguments(&self.arguments, f);
        format_directives(&self.directives, f);
        match self.selection_set {
            Some(ref set) => {
                f.space();
                format_selections(set, f);
            }
            None => f.endline(),
        }
    }
}

impl Displayable for OperationDefinition {
    fn display(&self, f: &mut Formatter) {
        f.margin();
        f.indent();
        f.write(self.kind.as_str());
        if let Some(ref name) = self.name {
            f.space();
            f.write(name);
        }
        if !self.variable_definitions.is_empty() {
            f.write("(");
            for (idx, var) in self.variable_definitions.iter().enumerate() {
                if idx > 0 {
                    f.write(",");
                    f.space();
                }
                var.display(f);
            }
            f.write(")");
        }
        format_directives(&self.directives, f);
        f.space();
        format_selections(&self.selection_set, f);
    }
}

impl Displayable for VariableDefinition {
    fn display(&self, f: &mut Formatter) {
        f.write("$");
        f.write(&self.name);
        f.write(":");
        f.space();
        self.var_type.display(f);
        if let Some(ref default) = self.default_value {
            f.space();
            f.write("=");
            f.space();
            default.display(f);
        }
    }
}

impl Displayable for Type {
    fn display(&self, f: &mut Formatter) {
        f.write(&self.to_string());
    }
}

impl Displayable for InlineFragment {
    fn display(&self, f: &mut Formatter) {
        f.indent();
        f.write("...");
        if let Some(ref cond) = self.type_condition {
            f.space();
            f.write("on");
            f.space();
            f.write(cond);
        }
        format_directives(&self.directives, f);
        f.space();
        format_selections(&self.selection_set, f);
    }
}

impl Displayable for FragmentSpread {
    fn display(&self, f: &mut Formatter) {
        f.indent();
        f.write("...");
        f.write(&self.fragment_name);
        format_directives(&self.directives, f);
        f.endline();
    }
}

impl_display!(
    Document,
    Definition,
    OperationDefinition,
    FragmentDefinition,
    SelectionSet,
    Selection,
    Field,
    VariableDefinition,
    Value,
    InlineFragment,
    FragmentSpread,
    Directive,
);
