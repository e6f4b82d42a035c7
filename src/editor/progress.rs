/// Heures hebdomadaires prises par défaut quand le contrat n'en précise pas.
pub const DEFAULT_CONTRACT_HOURS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    /// au-delà du contrat (> 100 %)
    Over,
    /// proche de l'objectif (> 90 %)
    NearTarget,
    Under,
}

impl ProgressBand {
    pub fn color(self) -> &'static str {
        match self {
            ProgressBand::Over => "#e74c3c",
            ProgressBand::NearTarget => "#27ae60",
            ProgressBand::Under => "#f39c12",
        }
    }
}

/// Heures planifiées sur la semaine comparées aux heures du contrat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractProgress {
    pub weekly_hours: f64,
    pub contract_hours: f64,
    pub percentage: f64,
    /// Largeur de barre, plafonnée à 100.
    pub bar_width: f64,
    pub band: ProgressBand,
}

impl ContractProgress {
    pub fn compute(weekly_minutes: u32, contract_hours: f64) -> Self {
        let contract_hours = if contract_hours > 0.0 {
            contract_hours
        } else {
            DEFAULT_CONTRACT_HOURS
        };
        let weekly_hours = f64::from(weekly_minutes) / 60.0;
        let percentage = weekly_hours / contract_hours * 100.0;
        let band = if percentage > 100.0 {
            ProgressBand::Over
        } else if percentage > 90.0 {
            ProgressBand::NearTarget
        } else {
            ProgressBand::Under
        };
        Self {
            weekly_hours,
            contract_hours,
            percentage,
            bar_width: percentage.min(100.0),
            band,
        }
    }

    /// Barre texte de `width` caractères, ex. "[#######   ] 72%".
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.bar_width / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!(
            "[{}{}] {:.0}%",
            "#".repeat(filled),
            " ".repeat(width - filled),
            self.percentage
        )
    }
}
