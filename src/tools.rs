use crate::shapes::Tool;

/// The drawing flag and the tool picked in the toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToolState {
    drawing: bool,
    selected: Option<Tool>,
}

impl ToolState {
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn set_drawing(&mut self, drawing: bool) {
        self.drawing = drawing;
    }

    pub fn selected(&self) -> Option<Tool> {
        self.selected
    }

    pub fn set_selected(&mut self, tool: Option<Tool>) {
        self.selected = tool;
    }

    /// Pick `tool`, or drop the selection if it was already picked.
    pub fn toggle(&mut self, tool: Tool) {
        self.selected = if self.selected == Some(tool) {
            None
        } else {
            Some(tool)
        };
        log::debug!("selected tool: {:?}", self.selected);
    }
}
