// libsuica/src/card/info.rs

use crate::card::TagHandle;
use crate::types::{Idm, Pmm, SystemCode};

/// FeliCa view of a detected tag (IDm/PMm/SystemCode).
///
/// Commands are addressed by IDm; the handle ties the view back to the
/// hardware's own tag object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FelicaTag {
    /// Hardware tag object this view belongs to.
    pub handle: TagHandle,
    /// Manufacture ID; the address of every command.
    pub idm: Idm,
    /// Manufacture parameters.
    pub pmm: Pmm,
    /// Reported by Polling when requested.
    pub system_code: Option<SystemCode>,
}

impl FelicaTag {
    /// View over an already polled card.
    pub fn new(handle: TagHandle, idm: Idm, pmm: Pmm, system_code: Option<SystemCode>) -> Self {
        Self {
            handle,
            idm,
            pmm,
            system_code,
        }
    }

    /// Card IDm.
    pub fn idm(&self) -> &Idm {
        &self.idm
    }

    /// Card PMm.
    pub fn pmm(&self) -> &Pmm {
        &self.pmm
    }

    /// System code, when the card sent one.
    pub fn system_code(&self) -> Option<SystemCode> {
        self.system_code
    }
}
