//! Immutable updates to a [`FamilyData`].
//!
//! Every operation borrows the current record and returns a new one. The
//! receiver is never modified, so a failed operation leaves the caller with
//! the record it started from.

use thiserror::Error;

use crate::domain::{
    person::PersonUpdate,
    record::{Child, ChildUpdate, FamilyData, Grandchild, SpouseUpdate},
};

/// Errors that can occur when updating a family record.
///
/// Fields hold zero-based indices; messages count from one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    /// No child exists at the given position.
    #[error("there is no child {} (the record has {len} children)", .index + 1)]
    ChildIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of children in the record.
        len: usize,
    },
    /// No grandchild exists at the given position.
    #[error("child {} has no grandchild {} (it has {len})", .child + 1, .index + 1)]
    GrandchildIndexOutOfRange {
        /// Index of the owning child.
        child: usize,
        /// The requested grandchild index.
        index: usize,
        /// The number of grandchildren the child has.
        len: usize,
    },
    /// No additional phone number exists at the given position.
    #[error(
        "child {} has no additional phone number {} (it has {len})",
        .child + 1,
        .index + 1
    )]
    PhoneIndexOutOfRange {
        /// Index of the owning child.
        child: usize,
        /// The requested phone number index.
        index: usize,
        /// The number of additional phone numbers the child has.
        len: usize,
    },
    /// The spouse of an unmarried child cannot be edited.
    #[error("child {} is not married", .child + 1)]
    NotMarried {
        /// Index of the child.
        child: usize,
    },
}

impl FamilyData {
    /// Applies a partial update to the family head.
    #[must_use]
    pub fn update_head(&self, update: &PersonUpdate) -> Self {
        Self {
            head: self.head.merged(update),
            children: self.children.clone(),
        }
    }

    /// Applies a partial update to the child at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::ChildIndexOutOfRange`] if there is no such
    /// child.
    pub fn update_child(&self, index: usize, update: &ChildUpdate) -> Result<Self, MutationError> {
        self.with_child(index, |child| Ok(child.merged(update)))
    }

    /// Appends an empty, unmarried child.
    #[must_use]
    pub fn add_child(&self) -> Self {
        let mut children = self.children.clone();
        children.push(Child::default());
        Self {
            head: self.head.clone(),
            children,
        }
    }

    /// Removes the child at `index`, shifting later children down by one.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::ChildIndexOutOfRange`] if there is no such
    /// child.
    pub fn remove_child(&self, index: usize) -> Result<Self, MutationError> {
        self.check_child(index)?;
        let mut children = self.children.clone();
        children.remove(index);
        Ok(Self {
            head: self.head.clone(),
            children,
        })
    }

    /// Applies a partial update to the spouse of the child at `child`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::ChildIndexOutOfRange`] if there is no such
    /// child, or [`MutationError::NotMarried`] if the child is not married.
    pub fn update_spouse(
        &self,
        child: usize,
        update: &SpouseUpdate,
    ) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            if !current.is_married() {
                return Err(MutationError::NotMarried { child });
            }
            let spouse = current.spouse.clone().unwrap_or_default().merged(update);
            Ok(Child {
                spouse: Some(spouse),
                ..current.clone()
            })
        })
    }

    /// Applies a partial update to grandchild `grandchild` of child `child`.
    ///
    /// # Errors
    ///
    /// Returns an index error if either the child or the grandchild does not
    /// exist.
    pub fn update_grandchild(
        &self,
        child: usize,
        grandchild: usize,
        update: &PersonUpdate,
    ) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            check_grandchild(current, child, grandchild)?;
            let mut children = current.children.clone();
            children[grandchild] = children[grandchild].merged(update);
            Ok(Child {
                children,
                ..current.clone()
            })
        })
    }

    /// Appends an empty grandchild to the child at `child`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::ChildIndexOutOfRange`] if there is no such
    /// child.
    pub fn add_grandchild(&self, child: usize) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            let mut children = current.children.clone();
            children.push(Grandchild::default());
            Ok(Child {
                children,
                ..current.clone()
            })
        })
    }

    /// Removes grandchild `grandchild` from child `child`, shifting later
    /// grandchildren down by one.
    ///
    /// # Errors
    ///
    /// Returns an index error if either the child or the grandchild does not
    /// exist.
    pub fn remove_grandchild(
        &self,
        child: usize,
        grandchild: usize,
    ) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            check_grandchild(current, child, grandchild)?;
            let mut children = current.children.clone();
            children.remove(grandchild);
            Ok(Child {
                children,
                ..current.clone()
            })
        })
    }

    /// Appends an additional phone number to the child at `child`.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::ChildIndexOutOfRange`] if there is no such
    /// child.
    pub fn add_phone_number(&self, child: usize, number: String) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            let mut numbers = current.additional_phone_numbers.clone();
            numbers.push(number);
            Ok(Child {
                additional_phone_numbers: numbers,
                ..current.clone()
            })
        })
    }

    /// Replaces additional phone number `index` of the child at `child`.
    ///
    /// # Errors
    ///
    /// Returns an index error if either the child or the phone number does
    /// not exist.
    pub fn update_phone_number(
        &self,
        child: usize,
        index: usize,
        number: String,
    ) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            check_phone(current, child, index)?;
            let mut numbers = current.additional_phone_numbers.clone();
            numbers[index] = number;
            Ok(Child {
                additional_phone_numbers: numbers,
                ..current.clone()
            })
        })
    }

    /// Removes additional phone number `index` of the child at `child`.
    ///
    /// # Errors
    ///
    /// Returns an index error if either the child or the phone number does
    /// not exist.
    pub fn remove_phone_number(&self, child: usize, index: usize) -> Result<Self, MutationError> {
        self.with_child(child, |current| {
            check_phone(current, child, index)?;
            let mut numbers = current.additional_phone_numbers.clone();
            numbers.remove(index);
            Ok(Child {
                additional_phone_numbers: numbers,
                ..current.clone()
            })
        })
    }

    fn check_child(&self, index: usize) -> Result<(), MutationError> {
        if index < self.children.len() {
            Ok(())
        } else {
            Err(MutationError::ChildIndexOutOfRange {
                index,
                len: self.children.len(),
            })
        }
    }

    /// Builds a new record in which the child at `index` is replaced by the
    /// result of `f`.
    fn with_child<F>(&self, index: usize, f: F) -> Result<Self, MutationError>
    where
        F: FnOnce(&Child) -> Result<Child, MutationError>,
    {
        self.check_child(index)?;
        let replacement = f(&self.children[index])?;
        let mut children = self.children.clone();
        children[index] = replacement;
        Ok(Self {
            head: self.head.clone(),
            children,
        })
    }
}

fn check_grandchild(current: &Child, child: usize, index: usize) -> Result<(), MutationError> {
    if index < current.children.len() {
        Ok(())
    } else {
        Err(MutationError::GrandchildIndexOutOfRange {
            child,
            index,
            len: current.children.len(),
        })
    }
}

fn check_phone(current: &Child, child: usize, index: usize) -> Result<(), MutationError> {
    if index < current.additional_phone_numbers.len() {
        Ok(())
    } else {
        Err(MutationError::PhoneIndexOutOfRange {
            child,
            index,
            len: current.additional_phone_numbers.len(),
        })
    }
}
