//! Combinator diagrams after Tromp.
//!
//! Every variable occurrence gets a column. Its stem hangs from the row of
//! the abstraction that binds it down to the lowest application bridge that
//! consumes it. Abstractions are bars spanning their whole body, applications
//! are bars joining one column of each operand.
//!
//! Layout units are converted to canvas cells as 4 cells per column and 2
//! cells per row, and the canvas is packed into one glyph per 2x4 cells.

use tracing::debug;

use crate::{glyph::glyph, prelude::*, term::Term};

/// Which column of the left operand an application bridge starts from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, derive_more::Display)]
pub enum Style {
    /// Rightmost branching column of the left operand.
    #[default]
    #[display(fmt = "alternative")]
    Alternative,
    /// Leftmost branching column of the left operand. The first stem is
    /// extended one row below everything else.
    #[display(fmt = "classic")]
    Classic,
}

impl std::str::FromStr for Style {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alternative" => Ok(Style::Alternative),
            "classic" => Ok(Style::Classic),
            _ => Err(format!("Unknown diagram style `{s}`")),
        }
    }
}

/// Limits on the emitted glyph grid. The canvas itself is never cropped.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Viewport {
    pub max_columns: Option<usize>,
    pub max_lines: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Options {
    pub style: Style,
    pub viewport: Viewport,
}

/// Horizontal bar from column `start` to column `end` (inclusive) at `row`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bridge {
    pub row: usize,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Layout {
    /// Row of the binding abstraction, per column.
    pub binders: Vec<usize>,
    /// Row just below the lowest bridge attached to the stem, per column.
    pub depths: Vec<usize>,
    pub abstractions: Vec<Bridge>,
    pub applications: Vec<Bridge>,
}

enum Frame<'a> {
    Enter(&'a Term),
    CloseAbs { start: usize },
    CloseApply,
}

impl Layout {
    /// Lays out `term` in a single pre-order pass over an explicit stack.
    pub fn of(term: &Term, style: Style) -> Result<Self, InvalidTermError> {
        let mut layout = Layout::default();
        // (leftmost, rightmost) bridgeable columns of each finished operand
        let mut branches: Vec<(usize, usize)> = vec![];
        let mut open = 0;
        let mut stack = vec![Frame::Enter(term)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(Term::Var(index)) => {
                    let column = layout.binders.len();
                    if *index >= open {
                        return Err(InvalidTermError::FreeVariable {
                            index: *index,
                            depth: open,
                            occurrence: column,
                        });
                    }
                    layout.binders.push(open - index - 1);
                    layout.depths.push(open);
                    branches.push((column, column));
                }
                Frame::Enter(Term::Abs(body)) => {
                    stack.push(Frame::CloseAbs {
                        start: layout.binders.len(),
                    });
                    stack.push(Frame::Enter(body));
                    open += 1;
                }
                Frame::Enter(Term::Apply(lhs, rhs)) => {
                    stack.push(Frame::CloseApply);
                    stack.push(Frame::Enter(rhs));
                    stack.push(Frame::Enter(lhs));
                }
                Frame::CloseAbs { start } => {
                    open -= 1;
                    layout.abstractions.push(Bridge {
                        row: open,
                        start,
                        end: layout.binders.len() - 1,
                    });
                }
                Frame::CloseApply => {
                    let (Some((right, _)), Some(left)) = (branches.pop(), branches.pop()) else {
                        unreachable!("Application closed without both operands");
                    };
                    let left = match style {
                        Style::Alternative => left.1,
                        Style::Classic => left.0,
                    };
                    let row = std::cmp::max(layout.depths[left], layout.depths[right]);
                    layout.applications.push(Bridge {
                        row,
                        start: left,
                        end: right,
                    });
                    layout.depths[left] = row + 1;
                    layout.depths[right] = row + 1;
                    branches.push((left, right));
                }
            }
        }
        if style == Style::Classic {
            if let Some(first) = layout.depths.first_mut() {
                *first += 1;
            }
        }
        Ok(layout)
    }

    pub fn columns(&self) -> usize {
        self.binders.len()
    }

    /// Maximum application depth over all columns.
    pub fn depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    pub fn rasterize(&self) -> Canvas {
        let mut canvas = Canvas::new(4 * self.columns(), 2 * self.depth());
        for (column, (&top, &bottom)) in self.binders.iter().zip(&self.depths).enumerate() {
            canvas.vline(column * 4 + 1, top * 2, (bottom * 2).saturating_sub(1));
        }
        for bridge in &self.abstractions {
            canvas.hline(bridge.row * 2, bridge.start * 4, bridge.end * 4 + 3);
        }
        for bridge in &self.applications {
            canvas.hline(bridge.row * 2, bridge.start * 4 + 1, bridge.end * 4 + 2);
        }
        canvas
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells outside the canvas read as unset.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    fn set(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = true;
        }
    }

    /// Sets `x` on rows `from..to`.
    fn vline(&mut self, x: usize, from: usize, to: usize) {
        for y in from..to {
            self.set(x, y);
        }
    }

    /// Sets columns `from..to` on row `y`.
    fn hline(&mut self, y: usize, from: usize, to: usize) {
        for x in from..to {
            self.set(x, y);
        }
    }

    fn nibble(&self, x: usize, y: usize) -> usize {
        usize::from(self.get(x, y))
            | usize::from(self.get(x + 1, y)) << 1
            | usize::from(self.get(x, y + 1)) << 2
            | usize::from(self.get(x + 1, y + 1)) << 3
    }

    /// One line per 4 rows, one glyph per 2 columns, each line newline
    /// terminated.
    pub fn encode(&self, viewport: Viewport) -> String {
        let within = |limit: Option<usize>, n: usize| limit.map_or(true, |limit| n < limit);
        let mut graph = String::new();
        for (line, y) in (0..self.height).step_by(4).enumerate() {
            if !within(viewport.max_lines, line) {
                break;
            }
            for (column, x) in (0..self.width).step_by(2).enumerate() {
                if !within(viewport.max_columns, column) {
                    break;
                }
                graph.push(glyph(self.nibble(x, y + 2), self.nibble(x, y)));
            }
            graph.push('\n');
        }
        graph
    }
}

/// Draws `term` as a glyph grid. Open terms have no diagram.
pub fn render(term: &Term, options: &Options) -> Result<String, InvalidTermError> {
    let layout = Layout::of(term, options.style)?;
    let canvas = layout.rasterize();
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        "rasterized diagram"
    );
    Ok(canvas.encode(options.viewport))
}
