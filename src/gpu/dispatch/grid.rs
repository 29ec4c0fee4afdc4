use super::DispatchError;

/// One-dimensional grid for `count` elements in groups of `group_size`.
///
/// The grid is rounded up to whole groups, so it may hold up to
/// `group_size - 1` threads past `count`; the kernel must skip them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    pub count: usize,
    pub group_size: u32,
    pub groups: u32,
}

impl LaunchConfig {
    pub fn for_elements(count: usize, group_size: u32) -> Result<Self, DispatchError> {
        if group_size == 0 {
            return Err(DispatchError::InvalidGroupSize);
        }
        if count == 0 {
            return Err(DispatchError::EmptyGrid);
        }

        let groups = count.div_ceil(group_size as usize);
        let groups = u32::try_from(groups)
            .ok()
            .filter(|g| *g <= i32::MAX as u32)
            .ok_or(DispatchError::GridTooLarge { count, group_size })?;

        Ok(Self { count, group_size, groups })
    }

    /// `ceil(count / group_size) * group_size`.
    pub fn total_threads(&self) -> u64 {
        self.groups as u64 * self.group_size as u64
    }

    /// Threads launched past the last element.
    pub fn idle_threads(&self) -> u64 {
        self.total_threads() - self.count as u64
    }

    pub fn grid(&self) -> (u32, u32, u32) {
        (self.groups, 1, 1)
    }

    pub fn block(&self) -> (u32, u32, u32) {
        (self.group_size, 1, 1)
    }
}
