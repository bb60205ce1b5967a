//! Loader for the XML program representation.
//!
//! ```text
//! <program language="IPPcode24">
//!   <instruction order="1" opcode="WRITE">
//!     <arg1 type="string">Hello\032World</arg1>
//!   </instruction>
//! </program>
//! ```
//!
//! Instructions run in document order and their `order` attributes must
//! be positive and strictly increasing. Argument elements may appear in
//! any order, but their numbering must have no gaps. Attribute values and
//! argument text are trimmed. Every structural problem is an
//! [`AsmError::Structure`] (exit 32); text that is not well-formed XML is
//! an [`AsmError::MalformedXml`] (exit 31).

use ippcode_common::{Instruction, Opcode, Operand, OperandError, Value, VarRef};
use roxmltree::{Document, Node};

use crate::error::AsmError;

const LANGUAGE: &str = "IPPcode24";
const ARG_NAMES: [&str; 3] = ["arg1", "arg2", "arg3"];

/// Parse an XML document into instructions paired with their source lines.
pub(crate) fn parse_document(text: &str) -> Result<Vec<(Instruction, usize)>, AsmError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let doc = Document::parse(text).map_err(|e| AsmError::MalformedXml {
        line: e.pos().row as usize,
        message: e.to_string(),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "program" {
        return Err(structure(
            root,
            format!(
                "root element must be 'program', found '{}'",
                root.tag_name().name()
            ),
        ));
    }
    match root.attribute("language") {
        Some(language) if language.trim() == LANGUAGE => {}
        Some(other) => {
            return Err(structure(
                root,
                format!("unsupported language '{other}'"),
            ))
        }
        None => return Err(structure(root, "missing 'language' attribute")),
    }

    let mut instructions = Vec::new();
    let mut previous_order = 0;
    for node in root.children().filter(|n| n.is_element()) {
        if node.tag_name().name() != "instruction" {
            return Err(structure(
                node,
                format!("unexpected element '{}'", node.tag_name().name()),
            ));
        }
        let order = parse_order(node)?;
        if order <= previous_order {
            return Err(structure(
                node,
                format!("order {order} does not follow {previous_order}"),
            ));
        }
        previous_order = order;
        instructions.push((parse_instruction(node)?, line_of(node)));
    }
    Ok(instructions)
}

fn parse_order(node: Node) -> Result<i64, AsmError> {
    let text = required_attribute(node, "order")?;
    text.parse()
        .map_err(|_| structure(node, format!("invalid order '{text}'")))
}

fn parse_instruction(node: Node) -> Result<Instruction, AsmError> {
    let mnemonic = required_attribute(node, "opcode")?;
    let opcode = Opcode::from_mnemonic(mnemonic)
        .ok_or_else(|| structure(node, format!("unknown opcode '{mnemonic}'")))?;

    let mut slots: [Option<Operand>; 3] = [None, None, None];
    for arg in node.children().filter(|n| n.is_element()) {
        let name = arg.tag_name().name();
        let index = ARG_NAMES
            .iter()
            .position(|n| *n == name)
            .ok_or_else(|| structure(arg, format!("unexpected element '{name}'")))?;
        if slots[index].is_some() {
            return Err(structure(arg, format!("duplicate '{name}'")));
        }
        slots[index] = Some(parse_argument(arg)?);
    }

    let given = slots.iter().take_while(|slot| slot.is_some()).count();
    if slots[given..].iter().any(Option::is_some) {
        return Err(structure(
            node,
            format!("{} has arguments without '{}'", opcode.mnemonic(), ARG_NAMES[given]),
        ));
    }

    let operands = slots.into_iter().flatten().collect();
    Instruction::new(opcode, operands).map_err(|e| structure(node, e.to_string()))
}

/// Build an operand from an `argN` element's `type` attribute and text.
fn parse_argument(arg: Node) -> Result<Operand, AsmError> {
    let ty = required_attribute(arg, "type")?;
    let text: String = arg
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    let text = text.trim();

    let parsed: Result<Operand, OperandError> = match ty {
        "var" => VarRef::parse(text).map(Operand::Var),
        "int" | "bool" | "string" | "nil" => Value::parse_literal(ty, text).map(Operand::Const),
        "label" => Operand::parse_label(text),
        "type" => Operand::parse_type(text),
        other => return Err(structure(arg, format!("unknown argument type '{other}'"))),
    };
    parsed.map_err(|e| structure(arg, e.to_string()))
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, AsmError> {
    node.attribute(name).map(str::trim).ok_or_else(|| {
        structure(
            node,
            format!("<{}> without '{name}' attribute", node.tag_name().name()),
        )
    })
}

/// 1-based line on which `node` starts.
fn line_of(node: Node) -> usize {
    node.document().text_pos_at(node.range().start).row as usize
}

fn structure(node: Node, message: impl Into<String>) -> AsmError {
    AsmError::Structure {
        line: line_of(node),
        message: message.into(),
    }
}
