mod properties;
mod scope_properties;
