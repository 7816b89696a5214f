/// Where a click inside an open modal landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Panel,
}

/// Open/closed dialog shell. Clicking the backdrop dismisses it; clicks on
/// the panel belong to its content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modal {
    open: bool,
}

impl Modal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns true when the click dismissed the modal, i.e. the caller
    /// should run its close handler.
    pub fn click(&mut self, target: ClickTarget) -> bool {
        if !self.open || target != ClickTarget::Backdrop {
            return false;
        }
        self.open = false;
        true
    }
}
