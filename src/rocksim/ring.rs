//! `Ring`, whose component kind depends on its `UsageCode`.

use super::base::{integer, length, radius, BaseFields, Part};
use crate::context::LoadingContext;
use crate::objects::{ComponentKind, Ring, RocketComponent};
use crate::warning::WarningSet;

#[derive(Default)]
pub(super) struct RingPart {
    outer: f64,
    inner: f64,
    length: f64,
    usage: Option<i32>,
}

impl Part for RingPart {
    fn read(&mut self, element: &str, content: &str, w: &mut WarningSet) -> bool {
        match element {
            "OD" => self.outer = radius(element, content, w).unwrap_or(self.outer),
            "ID" => self.inner = radius(element, content, w).unwrap_or(self.inner),
            "Len" => self.length = length(element, content, w).unwrap_or(self.length),
            "UsageCode" => self.usage = integer(element, content, w).or(self.usage),
            _ => return false,
        }
        true
    }

    fn build(
        self,
        _base: &BaseFields,
        _ctx: &LoadingContext<'_>,
        _warnings: &mut WarningSet,
    ) -> Option<RocketComponent> {
        let ring = Ring::new(self.length, self.outer, self.inner);
        let kind = match self.usage {
            Some(1) => ComponentKind::Bulkhead(Ring {
                inner_radius: 0.0,
                thickness: ring.outer_radius,
                ..ring
            }),
            Some(2) => ComponentKind::EngineBlock(ring),
            Some(4) => ComponentKind::TubeCoupler(ring),
            _ => ComponentKind::CenteringRing(ring),
        };
        Some(RocketComponent::with_kind(kind))
    }
}
