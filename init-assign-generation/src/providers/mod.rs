//! Shims around file access

// Native filesystem provider implementation
pub(crate) mod filesystem;

/// Type alias for the filesystem provider implementation.
///
/// On native platforms, this resolves to [`NativeFileSystemProvider`](filesystem::NativeFileSystemProvider).
pub type FileSystemProvider = filesystem::NativeFileSystemProvider;
