use crate::commands::{
    argument::FlagSpec,
    command::Command,
    node::Node,
    registry::CommandRegistry,
    source::CommandSource,
};
use indexmap::IndexSet;
use itertools::Itertools;

/// One line per command the actor may use, sorted by name.
pub fn generate_command_list(
    registry: &CommandRegistry,
    source: &CommandSource<'_>,
) -> Vec<String> {
    registry
        .commands()
        .iter()
        .filter(|command| command.can_use(source))
        .sorted_by(|a, b| a.name().cmp(b.name()))
        .map(|command| {
            let mut line = format!("/{}", command.name());
            if !command.aliases().is_empty() {
                line.push_str(&format!(" (Aliases: {})", command.aliases().join(", ")));
            }
            if let Some(description) = command.get_description() {
                line.push_str(&format!(" - {description}"));
            }
            line
        })
        .collect()
}

pub fn generate_flag_details(command: &Command) -> Vec<String> {
    let mut flags = IndexSet::default();
    for node in command.nodes() {
        get_flag_details_from_node(&mut flags, node);
    }
    flags
        .into_iter()
        .map(|spec| {
            let names = match spec.short() {
                Some(short) => format!("-{} | --{}", short, spec.long()),
                None => format!("--{}", spec.long()),
            };
            match spec.description() {
                Some(description) => format!("{names}: {description}"),
                None => names,
            }
        })
        .collect()
}

fn get_flag_details_from_node(all_flags: &mut IndexSet<FlagSpec>, node: &Node) {
    match node {
        Node::Argument { arg_type, .. } => all_flags.extend(arg_type.flag_specs().iter().cloned()),
        Node::Branch {
            when_true,
            when_false,
            ..
        } => {
            get_flag_details_from_node(all_flags, when_true);
            get_flag_details_from_node(all_flags, when_false);
        }
        Node::Optional { child, .. }
        | Node::Arity { child, .. }
        | Node::Modifiers { child, .. }
        | Node::Usage { child, .. }
        | Node::Suggest { child, .. }
        | Node::Silent(child) => get_flag_details_from_node(all_flags, child),
        Node::Literal { .. } | Node::Choice(_) | Node::Entity(_) => {}
    }
}
