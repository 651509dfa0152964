//! End-to-end taxonomy scenarios

use ezception::{EzcError, EzcResult, Kind, builtin, kind, root, taxonomy};

fn not_found() -> EzcResult<Kind> {
    Kind::declare("NotFoundError")
        .base(root())
        .message("{self.what!r} was not found")
        .detail("details", "Could not find {self.what!r} in {self.where!r}")
        .build()
}

#[test]
fn test_primary_message() -> EzcResult<()> {
    let fault = not_found()?.fault().with("what", "x");
    assert_eq!(fault.render_primary()?, "'x' was not found");
    assert_eq!(fault.to_string(), "'x' was not found");
    Ok(())
}

#[test]
fn test_detail_message() -> EzcResult<()> {
    let fault = not_found()?.fault().with("what", "x").with("where", "/y/");
    assert_eq!(fault.render_detail("details")?, "Could not find 'x' in '/y/'");
    // The generic attribute path reaches the same detail.
    assert_eq!(
        fault.attribute("details")?.to_string(),
        "Could not find 'x' in '/y/'"
    );
    Ok(())
}

#[test]
fn test_anonymous_derive_without_message() -> EzcResult<()> {
    let parent = Kind::declare("Loud").base(root()).message("loud").build()?;
    let quiet = kind!(parent[..])?;
    assert_eq!(quiet.fault().to_string(), "");
    assert!(quiet.is_anonymous());
    assert!(quiet.is_a(&parent));
    Ok(())
}

#[test]
fn test_reader_taxonomy() -> EzcResult<()> {
    let root = root();
    let reader = taxonomy! {
        Reader {
            Error = root[..],
            OpenError = Error["Could not open {self.path!r}"],
            NotFoundError = OpenError["{self.path!r} was not found"],
        }
    }?;

    let error = reader.get("Error").unwrap();
    let open = reader.get("OpenError").unwrap();
    let missing = reader.get("NotFoundError").unwrap();

    assert_eq!(error.qualname(), "Error");
    assert_eq!(open.qualname(), "OpenError");
    assert_eq!(missing.qualname(), "NotFoundError");
    assert!(!missing.is_anonymous());
    assert!(missing.is_a(open));
    assert!(missing.is_a(error));
    assert!(missing.is_a(root));

    let fault = missing.fault().with("path", "/etc/app.toml");
    assert_eq!(fault.describe(), "NotFoundError: '/etc/app.toml' was not found");
    Ok(())
}

#[test]
fn test_builtin_mixin() -> EzcResult<()> {
    let mixed = kind!(root()["BadArgument" => "bad argument {self.arg!r}"]; builtin::type_error())?;
    assert!(mixed.is_a(root()));
    assert!(mixed.is_a(builtin::type_error()));
    assert!(mixed.is_a(builtin::exception()));
    assert!(!mixed.is_a(builtin::value_error()));

    let fault = mixed.fault().with("arg", 3);
    assert!(fault.is_a(builtin::type_error()));
    assert_eq!(fault.to_string(), "bad argument 3");
    Ok(())
}

#[test]
fn test_undefined_detail() -> EzcResult<()> {
    let fault = not_found()?.fault();
    assert_eq!(
        fault.render_detail("reason"),
        Err(EzcError::AttributeLookup("ezmsg_reason".to_string()))
    );
    Ok(())
}

#[test]
fn test_fault_as_std_error() -> EzcResult<()> {
    fn open(path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let kind = not_found()?;
        kind.fault().with("what", path).err::<()>()?;
        Ok(())
    }

    let err = open("a.txt").unwrap_err();
    assert_eq!(err.to_string(), "'a.txt' was not found");
    Ok(())
}

#[test]
fn test_rendering_does_not_mutate() -> EzcResult<()> {
    let fault = not_found()?.fault().with("what", "x").with("where", "/y/");
    let before = fault.data().clone();
    let first = fault.render_detail("details")?;
    let second = fault.render_detail("details")?;
    assert_eq!(first, second);
    assert_eq!(fault.data(), &before);
    Ok(())
}
