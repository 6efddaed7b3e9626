//! Built-in converters, in their default chain order

mod identity;
mod things;
mod xml;
mod yaml_json;

pub use identity::IdentityResourceConverter;
pub use things::{ThingFormat, ThingsResourceConverter};
pub use xml::{xml_to_thing, XmlResourceConverter};
pub use yaml_json::YamlJsonResourceConverter;

use crate::converter::ResourceConverter;

pub fn default_converters() -> Vec<Box<dyn ResourceConverter>> {
    vec![
        Box::new(ThingsResourceConverter),
        Box::new(XmlResourceConverter),
        Box::new(YamlJsonResourceConverter),
        Box::new(IdentityResourceConverter),
    ]
}
