//! Conversion of package manifest metadata into the Swagger `info` section.

use crate::config::PackageMetadata;
use crate::error::{Error, Result};
use crate::openapi_builder::{Contact, Info, License};

/// Converts package metadata to a Swagger Info object.
///
/// Fields are passed through without defaulting: `name` becomes the title,
/// `author` and `homepage` the contact, `license` the license name. A contact
/// or license with nothing in it is left out entirely.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when no package metadata is supplied.
pub fn convert_package(pkg: Option<&PackageMetadata>) -> Result<Info> {
    let pkg = pkg.ok_or_else(|| {
        Error::Configuration("package metadata is required to build the info section".to_string())
    })?;

    let contact = Contact {
        name: pkg.author.as_ref().map(|author| author.name().to_string()),
        url: pkg.homepage.clone(),
        email: pkg
            .author
            .as_ref()
            .and_then(|author| author.email())
            .map(str::to_string),
    };

    let license = pkg.license.as_ref().map(|name| License {
        name: Some(name.clone()),
        url: None,
    });

    Ok(Info {
        title: pkg.name.clone(),
        description: pkg.description.clone(),
        version: pkg.version.clone(),
        terms_of_service: None,
        contact: (!contact.is_empty()).then_some(contact),
        license,
    })
}
