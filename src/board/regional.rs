//! Two-step wizard collecting primary and secondary region tags

use super::demand::{RegionCode, Regional};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Primary,
    Secondary,
}

/// Local wizard state. Nothing is persisted until `confirm`.
#[derive(Debug, Clone)]
pub struct RegionalWizard {
    step: WizardStep,
    primary: Option<RegionCode>,
    secondary: Option<RegionCode>,
    open: bool,
}

impl RegionalWizard {
    /// Start at step one, pre-filled from the assignment's current tags
    pub fn open(current: Regional) -> Self {
        Self {
            step: WizardStep::Primary,
            primary: current.primary,
            secondary: current.secondary,
            open: true,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn primary(&self) -> Option<RegionCode> {
        self.primary
    }

    pub fn secondary(&self) -> Option<RegionCode> {
        self.secondary
    }

    /// Pick the primary code. A secondary chosen earlier is kept as is.
    pub fn choose_primary(&mut self, code: RegionCode) {
        if self.step == WizardStep::Primary {
            self.primary = Some(code);
        }
    }

    pub fn can_advance(&self) -> bool {
        self.step == WizardStep::Primary && self.primary.is_some()
    }

    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step = WizardStep::Secondary;
        true
    }

    /// Return to step one, keeping the primary selection
    pub fn back(&mut self) {
        self.step = WizardStep::Primary;
    }

    /// Codes offered on step two: everything except the primary
    pub fn secondary_options(&self) -> Vec<RegionCode> {
        RegionCode::ALL
            .into_iter()
            .filter(|code| Some(*code) != self.primary)
            .collect()
    }

    pub fn choose_secondary(&mut self, code: RegionCode) -> bool {
        if self.step != WizardStep::Secondary || Some(code) == self.primary {
            return false;
        }
        self.secondary = Some(code);
        true
    }

    /// Options for the current step, in display order
    pub fn options(&self) -> Vec<RegionCode> {
        match self.step {
            WizardStep::Primary => RegionCode::ALL.to_vec(),
            WizardStep::Secondary => self.secondary_options(),
        }
    }

    /// Hand the selection to `on_save` and close. Only possible from step two
    /// once both codes are picked.
    pub fn confirm<F>(&mut self, on_save: F) -> bool
    where
        F: FnOnce(Regional),
    {
        if self.step != WizardStep::Secondary {
            return false;
        }
        let (Some(primary), Some(secondary)) = (self.primary, self.secondary) else {
            return false;
        };
        on_save(Regional {
            primary: Some(primary),
            secondary: Some(secondary),
        });
        self.open = false;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
