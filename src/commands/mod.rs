use crate::dovi::{L1Policy, MasteringPrimaries};

mod fel_data;

pub use fel_data::FelDataArgs;

#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimariesCli {
    #[value(name = "display-p3")]
    DisplayP3,
    #[value(name = "dci-p3")]
    DciP3,
    #[value(name = "bt2020")]
    Bt2020,
}

#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum L1PolicyCli {
    First,
    Max,
    Average,
}

impl From<PrimariesCli> for MasteringPrimaries {
    fn from(primaries: PrimariesCli) -> MasteringPrimaries {
        match primaries {
            PrimariesCli::DisplayP3 => MasteringPrimaries::DisplayP3,
            PrimariesCli::DciP3 => MasteringPrimaries::DciP3,
            PrimariesCli::Bt2020 => MasteringPrimaries::Bt2020,
        }
    }
}

impl From<L1PolicyCli> for L1Policy {
    fn from(policy: L1PolicyCli) -> L1Policy {
        match policy {
            L1PolicyCli::First => L1Policy::First,
            L1PolicyCli::Max => L1Policy::Max,
            L1PolicyCli::Average => L1Policy::Average,
        }
    }
}
