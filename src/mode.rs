//! Display fields selectable for each listed entry

use bitflags::bitflags;

use crate::kind::FileKind;

bitflags! {
    /// Which attributes are printed next to each path.
    ///
    /// Fields always render in the same order: kind, size, checksum,
    /// symlink flag, permissions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrintMode: u32 {
        /// `f`, `d` or `?` for regular files, directories and anything else.
        const KIND = 1 << 0;
        /// Length in bytes of regular files, e.g. `13b`. Blank for other kinds
        /// since their size is system dependent.
        const SIZE = 1 << 1;
        /// CRC-32 of regular file content, e.g. `crc=0451ac5e`, or `crc=n/a`.
        const CHECKSUM = 1 << 2;
        /// `sym=1` for symlinks, `sym=0` otherwise.
        const SYMLINK = 1 << 3;
        /// Unix permission bits in octal, e.g. `perm=644`.
        const PERM = 1 << 4;

        const DEFAULT = Self::KIND.bits() | Self::SIZE.bits();
        const ALL = Self::KIND.bits()
            | Self::SIZE.bits()
            | Self::CHECKSUM.bits()
            | Self::SYMLINK.bits()
            | Self::PERM.bits();
    }
}

impl PrintMode {
    /// Whether rendering an entry of `kind` needs a metadata lookup.
    pub(crate) fn needs_stat(self, kind: FileKind) -> bool {
        self.intersects(PrintMode::SYMLINK | PrintMode::PERM)
            || (self.contains(PrintMode::SIZE) && kind == FileKind::RegularFile)
    }
}

impl Default for PrintMode {
    fn default() -> Self {
        PrintMode::DEFAULT
    }
}
