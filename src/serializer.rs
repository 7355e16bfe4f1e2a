//! Renders a specification back to DSL text.
//!
//! Output is deterministic and re-parseable: operations appear in declaration
//! order and the specification's own sort is elided from axiom terms. Layout
//! and comments of the input text are not preserved.

use crate::model::{Axiom, Operation, Specification};

pub fn to_text(spec: &Specification) -> String {
    let mut out = String::new();

    out.push_str("type: ");
    out.push_str(spec.name());
    out.push('\n');

    out.push_str("sorts: ");
    out.push_str(&spec.dependency_sorts().join(", "));
    out.push('\n');

    out.push_str("operations:\n");
    for operation in spec.operations() {
        write_operation(&mut out, operation);
    }

    out.push_str("axioms:\n");
    for axiom in spec.axioms() {
        write_axiom(&mut out, axiom, spec.name());
    }

    out
}

fn write_operation(out: &mut String, operation: &Operation) {
    out.push('\t');
    out.push_str(&operation.to_string());
    out.push('\n');
}

fn write_axiom(out: &mut String, axiom: &Axiom, sort: &str) {
    out.push('\t');
    out.push_str(&axiom.pattern().render(Some(sort)));
    out.push_str(" = ");
    out.push_str(&axiom.template().render(Some(sort)));
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_specification;
    use pretty_assertions::assert_eq;

    const QUEUE: &str = "type: Queue
sorts: Number, bool
operations:
    empty() -> Queue
    enqueue(Queue, Number) -> Queue
    dequeue(Queue) -> Queue
    is_empty(Queue) -> bool
axioms:
    dequeue(enqueue(empty(), X)) = empty()
    dequeue(enqueue(enqueue(Q, Y), X)) = enqueue(dequeue(enqueue(Q, Y)), X)
    is_empty(empty()) = bool:true()
    is_empty(enqueue(Q, X)) = bool:false()
";

    #[test]
    fn test_to_text() {
        let spec = parse_specification(QUEUE).unwrap();
        let expected = "type: Queue\n\
sorts: Number, bool\n\
operations:\n\
\tempty() -> Queue\n\
\tenqueue(Queue, Number) -> Queue\n\
\tdequeue(Queue) -> Queue\n\
\tis_empty(Queue) -> bool\n\
axioms:\n\
\tdequeue(enqueue(empty(), X)) = empty()\n\
\tdequeue(enqueue(enqueue(Q, Y), X)) = enqueue(dequeue(enqueue(Q, Y)), X)\n\
\tis_empty(empty()) = bool:true()\n\
\tis_empty(enqueue(Q, X)) = bool:false()\n";
        assert_eq!(to_text(&spec), expected);
    }

    #[test]
    fn test_round_trip_is_structural() {
        let spec = parse_specification(QUEUE).unwrap();
        let reparsed = parse_specification(&to_text(&spec)).unwrap();
        assert_eq!(reparsed, spec);
    }

    #[test]
    fn test_display_uses_serializer() {
        let spec = parse_specification(QUEUE).unwrap();
        assert_eq!(spec.to_string(), to_text(&spec));
    }
}
