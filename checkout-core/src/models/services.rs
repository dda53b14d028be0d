use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional add-on services offered after the delivery time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdditionalService {
    Assembly,
    AdvancedAssembly,
    GreenReturn,
    IndoorDelivery,
}

impl AdditionalService {
    pub fn all() -> &'static [AdditionalService] {
        &[
            AdditionalService::Assembly,
            AdditionalService::AdvancedAssembly,
            AdditionalService::GreenReturn,
            AdditionalService::IndoorDelivery,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assembly => "assembly",
            Self::AdvancedAssembly => "advanced-assembly",
            Self::GreenReturn => "green-return",
            Self::IndoorDelivery => "indoor-delivery",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "assembly" => Some(Self::Assembly),
            "advanced-assembly" => Some(Self::AdvancedAssembly),
            "green-return" => Some(Self::GreenReturn),
            "indoor-delivery" => Some(Self::IndoorDelivery),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Assembly => "Assembly",
            Self::AdvancedAssembly => "Advanced Assembly",
            Self::GreenReturn => "Green Return",
            Self::IndoorDelivery => "Indoor Delivery",
        }
    }
}

/// Which add-on services the customer toggled on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub assembly: bool,
    pub advanced_assembly: bool,
    pub green_return: bool,
    pub indoor_delivery: bool,
}

impl ServiceSelection {
    pub fn is_selected(
        &self,
        service: AdditionalService,
    ) -> bool {
        match service {
            AdditionalService::Assembly => self.assembly,
            AdditionalService::AdvancedAssembly => self.advanced_assembly,
            AdditionalService::GreenReturn => self.green_return,
            AdditionalService::IndoorDelivery => self.indoor_delivery,
        }
    }

    pub fn set(
        &mut self,
        service: AdditionalService,
        selected: bool,
    ) {
        let flag = match service {
            AdditionalService::Assembly => &mut self.assembly,
            AdditionalService::AdvancedAssembly => &mut self.advanced_assembly,
            AdditionalService::GreenReturn => &mut self.green_return,
            AdditionalService::IndoorDelivery => &mut self.indoor_delivery,
        };
        *flag = selected;
    }

    /// True when at least one service is toggled on.
    pub fn any_selected(&self) -> bool {
        AdditionalService::all()
            .iter()
            .any(|service| self.is_selected(*service))
    }

    /// Selected services in display order.
    pub fn selected(&self) -> Vec<AdditionalService> {
        AdditionalService::all()
            .iter()
            .copied()
            .filter(|service| self.is_selected(*service))
            .collect()
    }
}

/// Fixed fee charged for each add-on service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceFees {
    pub assembly: Decimal,
    pub advanced_assembly: Decimal,
    pub green_return: Decimal,
    pub indoor_delivery: Decimal,
}

impl ServiceFees {
    pub fn fee(
        &self,
        service: AdditionalService,
    ) -> Decimal {
        match service {
            AdditionalService::Assembly => self.assembly,
            AdditionalService::AdvancedAssembly => self.advanced_assembly,
            AdditionalService::GreenReturn => self.green_return,
            AdditionalService::IndoorDelivery => self.indoor_delivery,
        }
    }
}

impl Default for ServiceFees {
    fn default() -> Self {
        Self {
            assembly: Decimal::new(2999, 2),
            advanced_assembly: Decimal::new(6999, 2),
            green_return: Decimal::new(1499, 2),
            indoor_delivery: Decimal::new(999, 2),
        }
    }
}
