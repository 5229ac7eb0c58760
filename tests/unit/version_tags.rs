//! Tag comparison as seen by callers of the public API.

use locres_studio::upgrade::{Platform, ReleaseDescriptor, VersionTag};

#[test]
fn test_prefix_case_and_whitespace_do_not_matter() {
    let local = VersionTag::new("v1.3.0\r\n");
    for remote in ["1.3.0", "V1.3.0", " v1.3.0 ", "vv1.3.0"] {
        assert!(local.matches(&VersionTag::new(remote)), "{remote}");
    }
}

#[test]
fn test_any_difference_is_an_update() {
    let local = VersionTag::new("v1.3.0");
    for remote in ["v1.3.1", "v1.2.9", "v1.3", "v1.3.0-beta"] {
        assert!(!local.matches(&VersionTag::new(remote)), "{remote}");
    }
}

#[test]
fn test_published_tag_is_used_verbatim_in_urls() {
    let platform = Platform::from_parts("windows", "x86").unwrap();
    let release = ReleaseDescriptor::new(VersionTag::new("V2.0"), &platform);

    assert_eq!(release.asset_name, "LocresStudio-V2.0-win-x86.zip");
    assert_eq!(
        release.download_url,
        "https://github.com/AcTePuKc/LocresStudio/releases/download/V2.0/LocresStudio-V2.0-win-x86.zip"
    );
}
