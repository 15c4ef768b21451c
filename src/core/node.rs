//! Purpose: The node facade itself: build JSON objects by typed adds, read them by typed gets.
//! Exports: `JsonNode`.
//! Role: Adapter between entity-data model code and serde_json object graphs.
//! Invariants: Keys are add-once; a second add of the same name is a `DuplicateKey` error.
//! Invariants: Missing properties are never an error on the read side.
//! Invariants: Container nesting beyond `MAX_DEPTH` fails on both read and write.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::Arc;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned, DeserializeSeed};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::core::error::{Error, ErrorKind};
use crate::core::item::{JsonItem, JsonSerializable};
use crate::json::camel::{CamelDeserializer, CamelSerializer};
use crate::json::limits::{MAX_DEPTH, depth_within};
use crate::json::hash::hash_object;

/// Wrapper over a mutable JSON object providing typed add/get accessors.
///
/// Nodes are built once (adds never overwrite) and read many times; the
/// optional config slot is an opaque passthrough for callers and takes no
/// part in equality or hashing.
pub struct JsonNode {
    jo: Map<String, Value>,
    config: Option<Arc<dyn Any + Send + Sync>>,
}

impl JsonNode {
    pub fn new() -> Self {
        Self {
            jo: Map::new(),
            config: None,
        }
    }

    /// Wraps an existing parsed object, taking ownership.
    pub fn from_map(jo: Map<String, Value>) -> Self {
        Self { jo, config: None }
    }

    pub fn try_from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            _ => Err(Error::new(ErrorKind::Convert)
                .with_message("top-level JSON value is not an object")),
        }
    }

    /// Converts a typed value through the engine's object-graph serializer.
    ///
    /// In camel mode structural field names are camel-cased; mapping keys are
    /// user data and stay verbatim.
    pub fn from_object<T: Serialize>(value: &T, camel_case: bool) -> Result<Self, Error> {
        let converted = if camel_case {
            value.serialize(CamelSerializer).map_err(Error::from_json)?
        } else {
            serde_json::to_value(value).map_err(Error::from_json)?
        };
        Self::try_from_value(converted)
    }

    /// Deserializes the wrapped object into a typed shape, honoring the same
    /// camel contract in reverse.
    pub fn to_object<T: DeserializeOwned>(&self, camel_case: bool) -> Result<T, Error> {
        let value = Value::Object(self.jo.clone());
        let result = if camel_case {
            T::deserialize(CamelDeserializer::new(&value))
        } else {
            serde_json::from_value(value)
        };
        result.map_err(Error::from_json)
    }

    pub fn is_empty(&self) -> bool {
        self.jo.is_empty()
    }

    /// True iff the property exists and holds a non-null scalar or a non-empty
    /// container.
    pub fn has_values(&self, name: &str) -> bool {
        match self.jo.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Array(items)) => !items.is_empty(),
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }

    pub fn config(&self) -> Option<&(dyn Any + Send + Sync)> {
        self.config.as_deref()
    }

    pub fn set_config(&mut self, config: Option<Arc<dyn Any + Send + Sync>>) {
        self.config = config;
    }

    pub fn with_config(mut self, config: Arc<dyn Any + Send + Sync>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.jo
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.jo
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.jo)
    }

    // -- Add methods ------------------------------------------------------

    /// Writes a scalar, skipping nulls and caller-specified defaults.
    pub fn add_primitive<T: Serialize>(
        &mut self,
        name: &str,
        value: Option<T>,
        default: Option<T>,
    ) -> Result<(), Error> {
        let Some(value) = value else { return Ok(()) };
        let value = serde_json::to_value(&value).map_err(Error::from_json)?;
        if value.is_null() {
            return Ok(());
        }
        if let Some(default) = default {
            let default = serde_json::to_value(&default).map_err(Error::from_json)?;
            if value == default {
                return Ok(());
            }
        }
        self.add_raw(name, value)
    }

    /// Writes an enum as its string name; never a numeric value.
    pub fn add_enum<E: Serialize>(&mut self, name: &str, value: E) -> Result<(), Error> {
        let raw = serde_json::to_value(&value).map_err(Error::from_json)?;
        match raw {
            Value::String(_) => self.add_raw(name, raw),
            _ => Err(Error::new(ErrorKind::Convert)
                .with_message("enum value did not serialize to a string name")
                .with_property(name)),
        }
    }

    pub fn add_opt_enum<E: Serialize>(&mut self, name: &str, value: Option<E>) -> Result<(), Error> {
        match value {
            None => Ok(()),
            Some(value) => self.add_enum(name, value),
        }
    }

    pub fn add_serializable(
        &mut self,
        name: &str,
        item: Option<&dyn JsonSerializable>,
    ) -> Result<(), Error> {
        let Some(item) = item else { return Ok(()) };
        let node = item.to_json_node(None);
        self.add_raw(name, node.into_value())
    }

    /// Writes an array of converted elements; an empty input adds nothing.
    pub fn add_array<I>(&mut self, name: &str, items: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: Into<JsonItem>,
    {
        let values: Vec<Value> = items
            .into_iter()
            .map(|item| item.into().into_value())
            .collect();
        if values.is_empty() {
            return Ok(());
        }
        self.add_raw(name, Value::Array(values))
    }

    pub fn add_array_with<I, F>(&mut self, name: &str, items: I, mut build: F) -> Result<(), Error>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> JsonNode,
    {
        let values: Vec<Value> = items
            .into_iter()
            .map(|item| build(item).into_value())
            .collect();
        if values.is_empty() {
            return Ok(());
        }
        self.add_raw(name, Value::Array(values))
    }

    /// Writes a sub-object built from a mapping; keys are taken verbatim and
    /// an empty (or absent) mapping adds nothing. `None` values become nulls.
    pub fn add_map<M, V>(&mut self, name: &str, map: M) -> Result<(), Error>
    where
        M: IntoIterator<Item = (String, V)>,
        V: Into<JsonItem>,
    {
        let mut object = Map::new();
        for (key, value) in map {
            object.insert(key, value.into().into_value());
        }
        if object.is_empty() {
            return Ok(());
        }
        self.add_raw(name, Value::Object(object))
    }

    pub fn add_node(&mut self, name: &str, node: Option<JsonNode>) -> Result<(), Error> {
        let Some(node) = node else { return Ok(()) };
        if node.is_empty() {
            return Ok(());
        }
        self.add_raw(name, node.into_value())
    }

    fn add_raw(&mut self, name: &str, value: Value) -> Result<(), Error> {
        if self.jo.contains_key(name) {
            return Err(Error::new(ErrorKind::DuplicateKey)
                .with_message("property already added")
                .with_property(name));
        }
        self.jo.insert(name.to_owned(), value);
        Ok(())
    }

    // -- Get methods ------------------------------------------------------

    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, Error> {
        match self.jo.get(name) {
            None => Ok(None),
            Some(value) => T::deserialize(value).map(Some).map_err(Error::from_json),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, Error> {
        Ok(self.get(name)?.unwrap_or(default))
    }

    pub fn get_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, Error> {
        Ok(self.get(name)?.unwrap_or_default())
    }

    /// Runtime-directed conversion of a property through a `DeserializeSeed`.
    pub fn get_seed<'a, S>(&'a self, name: &str, seed: S) -> Result<Option<S::Value>, Error>
    where
        S: DeserializeSeed<'a>,
    {
        match self.jo.get(name) {
            None => Ok(None),
            Some(value) => seed.deserialize(value).map(Some).map_err(Error::from_json),
        }
    }

    /// The raw sub-value, or `None` when absent.
    pub fn get_token(&self, name: &str) -> Option<&Value> {
        self.jo.get(name)
    }

    /// The member parsed from a string token; absent or null yields the
    /// default. A present non-string token is an `InvalidEnum` error.
    pub fn get_enum<E: DeserializeOwned>(&self, name: &str, default: E) -> Result<E, Error> {
        match self.jo.get(name) {
            None | Some(Value::Null) => Ok(default),
            Some(token) => parse_enum_token(name, token),
        }
    }

    /// Parses the raw string token as the plain enum type; absent or null
    /// yields `None`.
    pub fn get_nullable_enum<E: DeserializeOwned>(&self, name: &str) -> Result<Option<E>, Error> {
        match self.jo.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(token) => parse_enum_token(name, token).map(Some),
        }
    }

    /// Lazy, restartable element sequence; empty when the property is absent.
    /// A present non-array value yields a single `Convert` error.
    pub fn get_array<'a, T: DeserializeOwned + 'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = Result<T, Error>> + 'a {
        let (items, mismatch) = split_array(array_items(self.jo.get(name), name));
        mismatch.into_iter().map(Err).chain(
            items
                .iter()
                .map(|value| T::deserialize(value).map_err(Error::from_json)),
        )
    }

    /// Like `get_array`, but tries each name in order and uses the first
    /// present one.
    pub fn get_array_first<'a, T: DeserializeOwned + 'a>(
        &'a self,
        names: &[&str],
    ) -> impl Iterator<Item = Result<T, Error>> + 'a {
        let found = names
            .iter()
            .find_map(|name| self.jo.get(*name).map(|token| (*name, token)));
        let checked = match found {
            None => Ok(&[][..]),
            Some((name, token)) => array_items(Some(token), name),
        };
        let (items, mismatch) = split_array(checked);
        mismatch.into_iter().map(Err).chain(
            items
                .iter()
                .map(|value| T::deserialize(value).map_err(Error::from_json)),
        )
    }

    /// Pairs array elements positionally with converters; stops at the
    /// shorter of the two sequences. Empty when the property is absent.
    pub fn get_array_zip<T, C>(
        &self,
        name: &str,
        converters: impl IntoIterator<Item = C>,
    ) -> Result<Vec<T>, Error>
    where
        C: FnOnce(&Value) -> Result<T, Error>,
    {
        let items = array_items(self.jo.get(name), name)?;
        items
            .iter()
            .zip(converters)
            .map(|(value, convert)| convert(value))
            .collect()
    }

    /// Key-to-T mapping from a sub-object; empty when absent.
    pub fn get_map<T: DeserializeOwned>(&self, name: &str) -> Result<HashMap<String, T>, Error> {
        match self.jo.get(name) {
            None => Ok(HashMap::new()),
            Some(Value::Object(map)) => {
                let mut out = HashMap::with_capacity(map.len());
                for (key, value) in map {
                    let converted = T::deserialize(value)
                        .map_err(|err| Error::from_json(err).with_property(key.clone()))?;
                    out.insert(key.clone(), converted);
                }
                Ok(out)
            }
            Some(_) => Err(not_an_object(name)),
        }
    }

    /// Per-entry converted mapping. Absent property is `Ok(None)`; an existing
    /// empty object is `Ok(Some(empty))` — the two cases stay distinguishable.
    pub fn get_map_with<T, F>(&self, name: &str, mut convert: F) -> Result<Option<HashMap<String, T>>, Error>
    where
        F: FnMut(&str, &Value) -> Result<T, Error>,
    {
        match self.jo.get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => {
                let mut out = HashMap::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), convert(key, value)?);
                }
                Ok(Some(out))
            }
            Some(_) => Err(not_an_object(name)),
        }
    }

    /// Wraps a sub-object as a node, or `None` when absent.
    pub fn get_node(&self, name: &str) -> Result<Option<JsonNode>, Error> {
        match self.jo.get(name) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(JsonNode::from_map(map.clone()))),
            Some(_) => Err(not_an_object(name)),
        }
    }

    /// Lazy sequence of nodes over a sub-array; empty when absent. A present
    /// non-array value yields a single `Convert` error.
    pub fn get_node_array<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = Result<JsonNode, Error>> + 'a {
        let (items, mismatch) = split_array(array_items(self.jo.get(name), name));
        mismatch.into_iter().map(Err).chain(items.iter().map(|value| match value {
            Value::Object(map) => Ok(JsonNode::from_map(map.clone())),
            _ => Err(Error::new(ErrorKind::Convert)
                .with_message("array element is not an object")),
        }))
    }

    /// Key-to-node mapping over a sub-object; `None` when absent.
    pub fn get_node_map(&self, name: &str) -> Result<Option<HashMap<String, JsonNode>>, Error> {
        self.get_map_with(name, |key, value| match value {
            Value::Object(map) => Ok(JsonNode::from_map(map.clone())),
            _ => Err(not_an_object(key)),
        })
    }

    /// Key-to-node-sequence mapping, each value a sub-array wrapped
    /// element-by-element; `None` when absent.
    pub fn get_node_array_map(
        &self,
        name: &str,
    ) -> Result<Option<HashMap<String, Vec<JsonNode>>>, Error> {
        self.get_map_with(name, |key, value| match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => Ok(JsonNode::from_map(map.clone())),
                    _ => Err(Error::new(ErrorKind::Convert)
                        .with_message("array element is not an object")
                        .with_property(key)),
                })
                .collect(),
            _ => Err(not_an_array(key)),
        })
    }

    /// RFC 3339 parse of a string property, preserving the UTC offset.
    pub fn get_datetime(&self, name: &str) -> Result<Option<OffsetDateTime>, Error> {
        let Some(raw) = self.get::<String>(name)? else {
            return Ok(None);
        };
        OffsetDateTime::parse(&raw, &Rfc3339)
            .map(Some)
            .map_err(|err| {
                Error::new(ErrorKind::Parse)
                    .with_message("datetime token is not RFC 3339")
                    .with_property(name)
                    .with_source(err)
            })
    }

    // -- Serialize / deserialize ------------------------------------------

    /// Compact canonical text of the wrapped object.
    pub fn serialize(&self) -> Result<String, Error> {
        self.check_depth()?;
        serde_json::to_string(&self.jo).map_err(Error::from_json)
    }

    pub fn serialize_to_writer<W: io::Write>(&self, mut writer: W) -> Result<(), Error> {
        self.check_depth()?;
        serde_json::to_writer(&mut writer, &self.jo).map_err(Error::from_json)?;
        writer.flush().map_err(io_error)
    }

    /// Writes to a seekable sink and rewinds it, so the sink is immediately
    /// readable from the beginning.
    pub fn serialize_to_stream<S: io::Write + io::Seek>(&self, mut stream: S) -> Result<(), Error> {
        self.check_depth()?;
        serde_json::to_writer(&mut stream, &self.jo).map_err(Error::from_json)?;
        stream.flush().map_err(io_error)?;
        stream.seek(io::SeekFrom::Start(0)).map_err(io_error)?;
        Ok(())
    }

    pub fn deserialize_from_str(text: &str) -> Result<Self, Error> {
        let mut parser = serde_json::Deserializer::from_str(text);
        parser.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut parser))
            .map_err(Error::from_json)?;
        parser.end().map_err(Error::from_json)?;
        Self::from_parsed(value)
    }

    pub fn deserialize_from_reader<R: io::Read>(reader: R) -> Result<Self, Error> {
        let mut parser = serde_json::Deserializer::from_reader(reader);
        parser.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut parser))
            .map_err(Error::from_json)?;
        parser.end().map_err(Error::from_json)?;
        Self::from_parsed(value)
    }

    // The engine's own recursion limit is disabled on the read paths (its
    // fencepost sits one level below the cap), so the cap is enforced here on
    // the parsed tree with the same guard the write side uses.
    fn from_parsed(value: Value) -> Result<Self, Error> {
        if !depth_within(&value, MAX_DEPTH) {
            return Err(Error::new(ErrorKind::DepthExceeded)
                .with_message(format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        Self::try_from_value(value)
    }

    fn check_depth(&self) -> Result<(), Error> {
        // The root object itself is one container level.
        for value in self.jo.values() {
            if !depth_within(value, MAX_DEPTH - 1) {
                return Err(Error::new(ErrorKind::DepthExceeded)
                    .with_message(format!("nesting deeper than {MAX_DEPTH} levels")));
            }
        }
        Ok(())
    }
}

fn parse_enum_token<E: DeserializeOwned>(name: &str, token: &Value) -> Result<E, Error> {
    let Value::String(raw) = token else {
        return Err(Error::new(ErrorKind::InvalidEnum)
            .with_message("enum token is not a string")
            .with_property(name));
    };
    parse_enum(name, raw)
}

fn parse_enum<E: DeserializeOwned>(name: &str, raw: &str) -> Result<E, Error> {
    serde_json::from_value(Value::String(raw.to_owned())).map_err(|err| {
        Error::new(ErrorKind::InvalidEnum)
            .with_message(format!("\"{raw}\" is not a member name"))
            .with_property(name)
            .with_source(err)
    })
}

fn not_an_object(name: &str) -> Error {
    Error::new(ErrorKind::Convert)
        .with_message("property is not an object")
        .with_property(name)
}

fn not_an_array(name: &str) -> Error {
    Error::new(ErrorKind::Convert)
        .with_message("property is not an array")
        .with_property(name)
}

fn array_items<'a>(token: Option<&'a Value>, name: &str) -> Result<&'a [Value], Error> {
    match token {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(not_an_array(name)),
    }
}

fn split_array(checked: Result<&[Value], Error>) -> (&[Value], Option<Error>) {
    match checked {
        Ok(items) => (items, None),
        Err(err) => (&[], Some(err)),
    }
}

fn io_error(err: io::Error) -> Error {
    Error::new(ErrorKind::Io).with_source(err)
}

impl Default for JsonNode {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for JsonNode {
    fn clone(&self) -> Self {
        Self {
            jo: self.jo.clone(),
            config: self.config.clone(),
        }
    }
}

impl fmt::Debug for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonNode")
            .field("jo", &self.jo)
            .field("has_config", &self.config.is_some())
            .finish()
    }
}

impl fmt::Display for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(&self.jo).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

// Equality and hashing follow the deep structure of the wrapped object; the
// config slot is passthrough, not data.
impl PartialEq for JsonNode {
    fn eq(&self, other: &Self) -> bool {
        self.jo == other.jo
    }
}

impl Hash for JsonNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_object(&self.jo, state);
    }
}
