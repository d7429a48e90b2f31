mod classify;
mod waterfall;

pub use classify::{
    ResourceBreakdown, ResourceKind, ThirdPartyDomainGroup, classify, extract_domain,
    group_third_party, is_third_party,
};
pub use waterfall::{WATERFALL_WIDTH, WaterfallBar, waterfall};
