use glam::Mat4;
use smallvec::SmallVec;

/// Child bone indices; most joints have only a handful of children.
pub type BoneChildren = SmallVec<[usize; 4]>;

/// A joint in a [`Skeleton`](super::Skeleton).
///
/// Bones live in the skeleton's index-addressed arena. The tree is expressed
/// through indices: `parent` is a plain back-reference that never owns
/// anything, `children` is the list of bones this one is responsible for.
///
/// The authoritative fields are the two local transforms; the three `total_*`
/// fields are derived by the skeleton's recomputation pass and are only
/// mutated there.
#[derive(Debug, Clone)]
pub struct Bone {
    pub(crate) index: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) children: BoneChildren,

    // === Authoritative ===
    /// Rest placement relative to the parent, set when the rig is built.
    pub(crate) local_bind_transform: Mat4,
    /// Animated offset relative to the rest placement.
    pub(crate) local_transform: Mat4,

    // === Derived ===
    pub(crate) total_bind_transform: Mat4,
    pub(crate) total_transform: Mat4,
    pub(crate) total_bind_transform_inverse: Mat4,
}

impl Bone {
    pub(crate) fn new(
        index: usize,
        parent: Option<usize>,
        local_bind_transform: Mat4,
        local_transform: Mat4,
    ) -> Self {
        Self {
            index,
            parent,
            children: BoneChildren::new(),
            local_bind_transform,
            local_transform,
            total_bind_transform: Mat4::IDENTITY,
            total_transform: Mat4::IDENTITY,
            total_bind_transform_inverse: Mat4::IDENTITY,
        }
    }

    /// Stable index of this bone, also its slot in the output arrays.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Index of the parent bone, `None` for the root.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    #[must_use]
    pub fn local_bind_transform(&self) -> &Mat4 {
        &self.local_bind_transform
    }

    #[inline]
    #[must_use]
    pub fn local_transform(&self) -> &Mat4 {
        &self.local_transform
    }

    /// Rest pose accumulated from the root: `parent.total_bind · local_bind`.
    #[inline]
    #[must_use]
    pub fn total_bind_transform(&self) -> &Mat4 {
        &self.total_bind_transform
    }

    /// Animated pose accumulated from the root:
    /// `parent.total · local_bind · local`.
    #[inline]
    #[must_use]
    pub fn total_transform(&self) -> &Mat4 {
        &self.total_transform
    }

    /// Inverse of [`Self::total_bind_transform`]. Undefined (non-finite) when
    /// the bind pose is singular.
    #[inline]
    #[must_use]
    pub fn total_bind_transform_inverse(&self) -> &Mat4 {
        &self.total_bind_transform_inverse
    }
}
