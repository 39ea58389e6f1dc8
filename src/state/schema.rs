//! Schemas: the ordered block layout of a state.
//!
//! Offsets are a prefix sum of the block sizes, in declared order, computed
//! once when the schema is built.

use serde::{Deserialize, Serialize};

use super::block::{BlockKind, Bundle, Capabilities};

/// One block of a schema and where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSlot {
    /// The block
    pub kind: BlockKind,
    /// Index of the first parameter of the block
    pub offset: usize,
}

/// The ordered set of blocks defining a state layout.
///
/// # Examples
///
/// ```
/// use recon_state::{BlockKind, Schema};
///
/// let schema = Schema::builder()
///     .block(BlockKind::EDeposit)
///     .block(BlockKind::Position)
///     .build();
/// assert_eq!(schema.offset_of(BlockKind::Position), Some(1));
/// assert_eq!(schema.dimension(), 5);
/// assert_eq!(schema.type_name(), "EDeposit X Y Z T ");
/// ```
///
/// A schema is persisted as its ordered block list; the offsets and the
/// dimension are rebuilt on load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<BlockKind>", into = "Vec<BlockKind>")]
pub struct Schema {
    slots: Vec<BlockSlot>,
    dimension: usize,
}

impl Schema {
    /// Start an empty [`SchemaBuilder`].
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a schema from an ordered list of blocks.
    pub fn from_blocks(blocks: &[BlockKind]) -> Self {
        blocks
            .iter()
            .fold(SchemaBuilder::default(), |builder, &kind| builder.block(kind))
            .build()
    }

    /// A schema holding a single block.
    pub fn single(kind: BlockKind) -> Self {
        Self::from_blocks(&[kind])
    }

    /// The blocks with their offsets, in declared order.
    pub fn slots(&self) -> &[BlockSlot] {
        &self.slots
    }

    /// The block kinds, in declared order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.slots.iter().map(|slot| slot.kind)
    }

    /// Total number of parameters.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Offset of a block, or `None` if the schema does not hold it.
    pub fn offset_of(&self, kind: BlockKind) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| slot.kind == kind)
            .map(|slot| slot.offset)
    }

    /// Does the schema hold a block?
    pub fn contains(&self, kind: BlockKind) -> bool {
        self.offset_of(kind).is_some()
    }

    /// Field names of every block, in parameter order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.blocks().flat_map(|kind| kind.field_names().iter().copied())
    }

    /// The field names joined into the string that is hashed into the type
    /// tag. Each name is followed by a single space.
    pub fn type_name(&self) -> String {
        self.field_names().fold(String::new(), |mut name, field| {
            name.push_str(field);
            name.push(' ');
            name
        })
    }

    /// Offset of a bundle, if all of its blocks are present, adjacent, and in
    /// bundle order.
    pub fn bundle_offset(&self, bundle: Bundle) -> Option<usize> {
        let blocks = bundle.blocks();
        let start = self.slots.iter().position(|slot| slot.kind == blocks[0])?;
        let run = self.slots.get(start..start + blocks.len())?;
        run.iter()
            .zip(blocks)
            .all(|(slot, &kind)| slot.kind == kind)
            .then(|| self.slots[start].offset)
    }

    /// The blocks and bundles this layout exposes.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        for kind in self.blocks() {
            caps.insert_block(kind);
        }
        for bundle in Bundle::ALL {
            if self.bundle_offset(bundle).is_some() {
                caps.insert_bundle(bundle);
            }
        }
        caps
    }
}

impl From<Vec<BlockKind>> for Schema {
    fn from(blocks: Vec<BlockKind>) -> Self {
        Self::from_blocks(&blocks)
    }
}

impl From<Schema> for Vec<BlockKind> {
    fn from(schema: Schema) -> Self {
        schema.blocks().collect()
    }
}

/// Builder for [`Schema`]. Blocks are laid out in the order they are added;
/// adding a block that is already present has no effect.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    blocks: Vec<BlockKind>,
}

impl SchemaBuilder {
    /// Append a block after the ones already added.
    pub fn block(mut self, kind: BlockKind) -> Self {
        if !self.blocks.contains(&kind) {
            self.blocks.push(kind);
        }
        self
    }

    /// Add every block of a bundle, in bundle order.
    pub fn bundle(self, bundle: Bundle) -> Self {
        bundle.blocks().iter().fold(self, |builder, &kind| builder.block(kind))
    }

    /// Assign the offsets and finish the schema.
    pub fn build(self) -> Schema {
        let mut dimension = 0;
        let slots = self
            .blocks
            .into_iter()
            .map(|kind| {
                let slot = BlockSlot { kind, offset: dimension };
                dimension += kind.size();
                slot
            })
            .collect();
        Schema { slots, dimension }
    }
}

/// Offset of a block inside a static layout.
///
/// Evaluated at compile time for the typed states. Panics if the block is
/// not part of the layout.
pub const fn layout_offset(blocks: &[BlockKind], kind: BlockKind) -> usize {
    let mut offset = 0;
    let mut i = 0;
    while i < blocks.len() {
        if blocks[i] as u8 == kind as u8 {
            return offset;
        }
        offset += blocks[i].size();
        i += 1;
    }
    panic!("block kind is not part of the layout");
}

/// Offset of a bundle inside a static layout. Panics unless the bundle's
/// blocks are adjacent and in order.
pub const fn layout_bundle_offset(blocks: &[BlockKind], bundle: Bundle) -> usize {
    let members = bundle.blocks();
    let offset = layout_offset(blocks, members[0]);
    let mut expected = offset;
    let mut i = 0;
    while i < members.len() {
        if layout_offset(blocks, members[i]) != expected {
            panic!("bundle blocks are not contiguous in the layout");
        }
        expected += members[i].size();
        i += 1;
    }
    offset
}

/// Total dimension of a static layout.
pub const fn layout_dimension(blocks: &[BlockKind]) -> usize {
    let mut dimension = 0;
    let mut i = 0;
    while i < blocks.len() {
        dimension += blocks[i].size();
        i += 1;
    }
    dimension
}
