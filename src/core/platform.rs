//! Platform classification — one explicit settings value, one closed enum.
//!
//! Every step receives a `BuildSettings` constructed once at the CLI
//! boundary; nothing reads ambient process state later. Classification into
//! `TargetClass` is total and mutually exclusive: each (os, arch) pair maps
//! to exactly one class or to a configuration error, decided before any
//! pipeline stage runs.

use std::fmt;

/// Cross-compilation triple for the constrained mobile/store path.
pub const CROSS_TARGET: &str = "aarch64-uwp-windows-msvc";

/// Operating system of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Macos,
    Windows,
    WindowsStore,
}

impl Os {
    /// Detect the host operating system.
    pub fn from_host() -> Result<Self, String> {
        match std::env::consts::OS {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            other => Err(format!("unsupported host os: {}", other)),
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            "windows-store" | "windowsstore" => Ok(Self::WindowsStore),
            other => Err(format!(
                "unknown os '{}' (expected linux, macos, windows, windows-store)",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::WindowsStore => "windows-store",
        }
    }

    /// Windows or WindowsStore.
    pub fn is_windows_family(&self) -> bool {
        matches!(self, Self::Windows | Self::WindowsStore)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// CPU architecture of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Armv8,
}

impl Arch {
    /// Detect the host architecture.
    pub fn from_host() -> Result<Self, String> {
        match std::env::consts::ARCH {
            "x86_64" => Ok(Self::X86_64),
            "aarch64" => Ok(Self::Armv8),
            other => Err(format!("unsupported host arch: {}", other)),
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "armv8" | "aarch64" => Ok(Self::Armv8),
            other => Err(format!(
                "unknown arch '{}' (expected x86_64, armv8)",
                other
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Armv8 => "armv8",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build mode of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    Release,
    Debug,
}

impl BuildType {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "release" | "Release" => Ok(Self::Release),
            "debug" | "Debug" => Ok(Self::Debug),
            other => Err(format!(
                "unknown build type '{}' (expected release, debug)",
                other
            )),
        }
    }

    /// Token the external build toolchain expects (CMAKE_BUILD_TYPE, --config).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }

    /// Cargo profile output folder name.
    pub fn profile_dir(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Debug => "debug",
        }
    }

    pub fn is_debug(&self) -> bool {
        matches!(self, Self::Debug)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Target settings for one invocation. Constructed once, passed everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSettings {
    pub os: Os,
    pub arch: Arch,
    pub build_type: BuildType,
}

impl BuildSettings {
    /// Settings for the host machine (release mode).
    pub fn from_host() -> Result<Self, String> {
        Ok(Self {
            os: Os::from_host()?,
            arch: Arch::from_host()?,
            build_type: BuildType::Release,
        })
    }

    /// Windows or WindowsStore target.
    pub fn is_windows_family(&self) -> bool {
        self.os.is_windows_family()
    }

    /// The constrained mobile/store + 64-bit-ARM combination.
    pub fn is_constrained_arm64(&self) -> bool {
        self.os == Os::WindowsStore && self.arch == Arch::Armv8
    }

    /// Desktop Windows on 64-bit x86.
    pub fn is_windows_x64(&self) -> bool {
        self.os == Os::Windows && self.arch == Arch::X86_64
    }
}

impl fmt::Display for BuildSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.os, self.arch, self.build_type)
    }
}

/// The closed set of build/package paths. Every supported platform maps to
/// exactly one variant; unmatched Windows-family combinations are a
/// configuration error, never a silent fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetClass {
    /// WindowsStore + armv8: direct cargo cross build, manual packaging.
    ConstrainedArm64,
    /// Desktop Windows x64: standard toolchain build, manual packaging.
    WindowsX64,
    /// Everything else: standard toolchain build, toolchain install.
    OtherDesktop,
}

impl TargetClass {
    /// Map settings to a target class. Errors on Windows-family combinations
    /// with no packaging rule.
    pub fn classify(settings: &BuildSettings) -> Result<Self, String> {
        match (settings.os, settings.arch) {
            (Os::WindowsStore, Arch::Armv8) => Ok(Self::ConstrainedArm64),
            (Os::WindowsStore, arch) => Err(format!(
                "unsupported windows-store arch '{}': only armv8 has a build path",
                arch
            )),
            (Os::Windows, Arch::X86_64) => Ok(Self::WindowsX64),
            (Os::Windows, arch) => Err(format!(
                "unrecognized windows arch '{}': no packaging rule, refusing to guess",
                arch
            )),
            (Os::Linux | Os::Macos, _) => Ok(Self::OtherDesktop),
        }
    }

    /// True for the path that patches and cross-builds with cargo directly.
    pub fn is_constrained(&self) -> bool {
        matches!(self, Self::ConstrainedArm64)
    }

    /// True for Windows-family targets packaged by manual file selection.
    pub fn manual_packaging(&self) -> bool {
        matches!(self, Self::ConstrainedArm64 | Self::WindowsX64)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConstrainedArm64 => "constrained-arm64",
            Self::WindowsX64 => "windows-x64",
            Self::OtherDesktop => "other-desktop",
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(os: Os, arch: Arch, build_type: BuildType) -> BuildSettings {
        BuildSettings {
            os,
            arch,
            build_type,
        }
    }

    const ALL_OS: [Os; 4] = [Os::Linux, Os::Macos, Os::Windows, Os::WindowsStore];
    const ALL_ARCH: [Arch; 2] = [Arch::X86_64, Arch::Armv8];
    const ALL_BUILD: [BuildType; 2] = [BuildType::Release, BuildType::Debug];

    #[test]
    fn test_classify_total_and_mutually_exclusive() {
        for os in ALL_OS {
            for arch in ALL_ARCH {
                for bt in ALL_BUILD {
                    let s = settings(os, arch, bt);
                    // Predicates never overlap
                    assert!(
                        !(s.is_constrained_arm64() && s.is_windows_x64()),
                        "{} matched two predicates",
                        s
                    );
                    match TargetClass::classify(&s) {
                        Ok(tc) => {
                            // Exactly one path: constrained xor standard
                            assert_eq!(tc.is_constrained(), s.is_constrained_arm64());
                        }
                        Err(_) => {
                            // Only unmatched windows-family combinations fail
                            assert!(s.is_windows_family());
                            assert!(!s.is_constrained_arm64());
                            assert!(!s.is_windows_x64());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_classify_constrained() {
        let s = settings(Os::WindowsStore, Arch::Armv8, BuildType::Release);
        assert_eq!(
            TargetClass::classify(&s).unwrap(),
            TargetClass::ConstrainedArm64
        );
        assert!(s.is_constrained_arm64());
        assert!(s.is_windows_family());
        assert!(!s.is_windows_x64());
    }

    #[test]
    fn test_classify_windows_x64() {
        let s = settings(Os::Windows, Arch::X86_64, BuildType::Debug);
        assert_eq!(TargetClass::classify(&s).unwrap(), TargetClass::WindowsX64);
        assert!(s.is_windows_x64());
        assert!(!s.is_constrained_arm64());
    }

    #[test]
    fn test_classify_other_desktop() {
        for os in [Os::Linux, Os::Macos] {
            for arch in ALL_ARCH {
                let s = settings(os, arch, BuildType::Release);
                assert_eq!(
                    TargetClass::classify(&s).unwrap(),
                    TargetClass::OtherDesktop
                );
                assert!(!s.is_windows_family());
                assert!(!s.is_constrained_arm64());
                assert!(!s.is_windows_x64());
            }
        }
    }

    #[test]
    fn test_classify_unrecognized_windows_arch() {
        let s = settings(Os::Windows, Arch::Armv8, BuildType::Release);
        let err = TargetClass::classify(&s).unwrap_err();
        assert!(err.contains("unrecognized windows arch"), "got: {}", err);
    }

    #[test]
    fn test_classify_unsupported_store_arch() {
        let s = settings(Os::WindowsStore, Arch::X86_64, BuildType::Release);
        let err = TargetClass::classify(&s).unwrap_err();
        assert!(err.contains("windows-store"), "got: {}", err);
    }

    #[test]
    fn test_os_parse() {
        assert_eq!(Os::parse("linux").unwrap(), Os::Linux);
        assert_eq!(Os::parse("darwin").unwrap(), Os::Macos);
        assert_eq!(Os::parse("windows-store").unwrap(), Os::WindowsStore);
        assert!(Os::parse("beos").is_err());
    }

    #[test]
    fn test_arch_parse() {
        assert_eq!(Arch::parse("aarch64").unwrap(), Arch::Armv8);
        assert_eq!(Arch::parse("amd64").unwrap(), Arch::X86_64);
        assert!(Arch::parse("mips").is_err());
    }

    #[test]
    fn test_build_type_parse_and_tokens() {
        assert_eq!(BuildType::parse("release").unwrap(), BuildType::Release);
        assert_eq!(BuildType::parse("Debug").unwrap(), BuildType::Debug);
        assert!(BuildType::parse("profile").is_err());
        assert_eq!(BuildType::Release.as_str(), "Release");
        assert_eq!(BuildType::Debug.profile_dir(), "debug");
        assert!(BuildType::Debug.is_debug());
        assert!(!BuildType::Release.is_debug());
    }

    #[test]
    fn test_from_host() {
        // CI hosts are always one of the supported desktop platforms
        let s = BuildSettings::from_host().unwrap();
        assert_eq!(s.build_type, BuildType::Release);
    }

    #[test]
    fn test_settings_display() {
        let s = settings(Os::Windows, Arch::X86_64, BuildType::Release);
        assert_eq!(s.to_string(), "windows/x86_64/Release");
    }
}
