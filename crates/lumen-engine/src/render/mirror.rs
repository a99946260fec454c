//! Dirty-tracked fixed-size arrays mirrored into GPU storage buffers.
//!
//! The CPU array doubles as the upload staging area, so a steady-state frame
//! allocates nothing and uploads nothing.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Fixed-length array with a dirty flag.
///
/// Any mutable access marks the array dirty; [`DirtyArray::take_dirty`]
/// reads and clears the flag in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct DirtyArray<T> {
    data: Box<[T]>,
    dirty: bool,
}

impl<T: Copy> DirtyArray<T> {
    /// Creates a clean array of `len` copies of `fill`.
    pub fn new(len: usize, fill: T) -> Self {
        Self { data: vec![fill; len].into_boxed_slice(), dirty: false }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable access; marks the array dirty.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.dirty = true;
        &mut self.data
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the array was dirty and clears the flag.
    #[inline]
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// A [`DirtyArray`] and the storage buffer it mirrors.
///
/// The buffer is sized once from the array and never resized.
pub struct StorageMirror<T: Pod> {
    array: DirtyArray<T>,
    buffer: wgpu::Buffer,
}

impl<T: Pod> StorageMirror<T> {
    /// Creates the buffer initialized with the array's current contents.
    /// The array starts clean.
    pub fn new(device: &wgpu::Device, label: &str, mut array: DirtyArray<T>) -> Self {
        debug_assert!(!array.is_empty(), "StorageMirror `{label}` would be zero-sized");
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(array.as_slice()),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });
        array.take_dirty();
        Self { array, buffer }
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    #[inline]
    pub fn array(&self) -> &DirtyArray<T> {
        &self.array
    }

    /// Mutable access to the CPU side; marks it dirty.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.array.as_mut_slice()
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.array.mark_dirty();
    }

    /// Uploads the whole array if dirty. Returns whether an upload happened.
    pub fn flush(&mut self, queue: &wgpu::Queue) -> bool {
        if !self.array.take_dirty() {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(self.array.as_slice()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_array_is_clean_and_filled() {
        let a = DirtyArray::new(4, -1i32);
        assert!(!a.is_dirty());
        assert_eq!(a.as_slice(), &[-1, -1, -1, -1]);
    }

    #[test]
    fn mutable_access_marks_dirty() {
        let mut a = DirtyArray::new(2, 0.0f32);
        a.as_mut_slice()[1] = 3.0;
        assert!(a.is_dirty());
        assert_eq!(a.as_slice(), &[0.0, 3.0]);
    }

    #[test]
    fn take_dirty_clears_once() {
        let mut a = DirtyArray::new(1, 0u32);
        a.mark_dirty();
        assert!(a.take_dirty());
        assert!(!a.take_dirty());
        assert!(!a.is_dirty());
    }
}
