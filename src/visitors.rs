/*!

The simplification and reporting passes. Each submodule holds one pass
family; everything is re-exported here.

*/

pub mod bubble;
pub mod bubble_edge;
pub mod containment;
pub mod correct;
pub mod duplicate;
pub mod remodel;
pub mod repeat;
pub mod stats;
pub mod transitive;
pub mod trim;
pub mod writers;

pub use self::bubble::BubbleCollapse;
pub use self::bubble_edge::EdgeBubbleCollapse;
pub use self::containment::{remove_contained, ContainRemove, IdenticalRemove};
pub use self::correct::ErrorCorrect;
pub use self::duplicate::DuplicateRemove;
pub use self::remodel::{Remodel, ValidateStructure};
pub use self::repeat::SmallRepeatResolve;
pub use self::stats::{EdgeStats, GraphStats};
pub use self::transitive::TransitiveReduction;
pub use self::trim::{IslandRemove, Trim};
pub use self::writers::{BreakWriter, FastaWriter, OverlapWriter};
