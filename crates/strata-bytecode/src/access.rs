//! Class, method and field access flags

/// Declared public
pub const ACC_PUBLIC: u32 = 0x0001;
/// Declared private
pub const ACC_PRIVATE: u32 = 0x0002;
/// Declared protected
pub const ACC_PROTECTED: u32 = 0x0004;
/// Declared static
pub const ACC_STATIC: u32 = 0x0008;
/// Declared final
pub const ACC_FINAL: u32 = 0x0010;
/// Class flag: treat superclass methods specially (set by every modern compiler)
pub const ACC_SUPER: u32 = 0x0020;
/// Is an interface
pub const ACC_INTERFACE: u32 = 0x0200;
/// Declared abstract
pub const ACC_ABSTRACT: u32 = 0x0400;

/// Check whether the access modifiers describe a static member
#[inline]
pub fn is_static(access: u32) -> bool {
    access & ACC_STATIC != 0
}
