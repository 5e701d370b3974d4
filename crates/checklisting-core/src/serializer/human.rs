use crate::result::TaskResult;

/// Renders a result tree as one line per node, depth-first pre-order.
///
/// Each line is `[STATUS  ] message`, with the status padded to 8 columns and
/// 4 spaces of indentation per level.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanReadableSerializer;

impl HumanReadableSerializer {
    pub const INDENT_LENGTH: usize = 4;

    /// Render the whole tree as newline-joined text
    pub fn dumps(&self, result: &TaskResult) -> String {
        self.get_lines(result).collect::<Vec<_>>().join("\n")
    }

    /// Lazily render the tree line by line
    pub fn get_lines<'a>(&self, result: &'a TaskResult) -> Lines<'a> {
        Lines {
            stack: vec![(result, 0)],
        }
    }

    fn line(result: &TaskResult, depth: usize) -> String {
        format!(
            "{}[{:<8}] {}",
            " ".repeat(Self::INDENT_LENGTH * depth),
            result.status(),
            result.message()
        )
    }
}

/// Iterator over the rendered lines of a result tree
#[derive(Debug)]
pub struct Lines<'a> {
    stack: Vec<(&'a TaskResult, usize)>,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let (node, depth) = self.stack.pop()?;
        if let Some(children) = node.results() {
            // reversed so the first child is popped next
            self.stack
                .extend(children.iter().rev().map(|child| (child, depth + 1)));
        }
        Some(HumanReadableSerializer::line(node, depth))
    }
}
