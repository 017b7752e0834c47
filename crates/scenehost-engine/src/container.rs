//! Container asset decoding
//!
//! Accepts glTF 2.0 either as a binary container (GLB) or as a plain JSON
//! document. Only the JSON document is inspected to describe the model;
//! buffers and mesh data stay opaque.

use serde::Deserialize;
use std::sync::Arc;

use crate::asset::{ContainerResource, ModelResource};
use crate::error::AssetError;

const GLB_MAGIC: &[u8; 4] = b"glTF";
const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

#[derive(Debug, Deserialize)]
struct GltfDocument {
    asset: GltfAssetInfo,
    #[serde(default)]
    scene: Option<usize>,
    #[serde(default)]
    scenes: Vec<Named>,
    #[serde(default)]
    nodes: Vec<Named>,
    #[serde(default)]
    meshes: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct GltfAssetInfo {
    version: String,
    #[serde(default)]
    generator: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

fn decode_err(msg: impl Into<String>) -> AssetError {
    AssetError::Decode(msg.into())
}

/// Decode a container from raw bytes
pub fn decode_container(bytes: &[u8]) -> Result<ContainerResource, AssetError> {
    if bytes.starts_with(GLB_MAGIC) {
        decode_glb(bytes)
    } else if bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
    {
        decode_document(bytes, 0)
    } else {
        Err(decode_err("unrecognized container format"))
    }
}

fn decode_glb(bytes: &[u8]) -> Result<ContainerResource, AssetError> {
    if bytes.len() < GLB_HEADER_LEN {
        return Err(decode_err("truncated GLB header"));
    }
    let version = read_u32(bytes, 4).ok_or_else(|| decode_err("truncated GLB header"))?;
    if version != 2 {
        return Err(decode_err(format!("unsupported GLB version {}", version)));
    }
    let declared = read_u32(bytes, 8).ok_or_else(|| decode_err("truncated GLB header"))? as usize;
    if declared > bytes.len() {
        return Err(decode_err(format!(
            "GLB declares {} bytes but only {} are present",
            declared,
            bytes.len()
        )));
    }
    let bytes = &bytes[..declared];

    let json_len = read_u32(bytes, GLB_HEADER_LEN).ok_or_else(|| decode_err("missing JSON chunk"))? as usize;
    let json_type = read_u32(bytes, GLB_HEADER_LEN + 4).ok_or_else(|| decode_err("missing JSON chunk"))?;
    if json_type != CHUNK_JSON {
        return Err(decode_err("first GLB chunk is not JSON"));
    }
    let json_start = GLB_HEADER_LEN + CHUNK_HEADER_LEN;
    let json = bytes
        .get(json_start..json_start + json_len)
        .ok_or_else(|| decode_err("JSON chunk runs past end of container"))?;

    let bin_offset = json_start + json_len;
    let binary_len = match (read_u32(bytes, bin_offset), read_u32(bytes, bin_offset + 4)) {
        (Some(len), Some(CHUNK_BIN)) => len as usize,
        _ => 0,
    };

    decode_document(json, binary_len)
}

fn decode_document(json: &[u8], binary_len: usize) -> Result<ContainerResource, AssetError> {
    let doc: GltfDocument =
        serde_json::from_slice(json).map_err(|e| decode_err(format!("invalid glTF JSON: {}", e)))?;

    if !doc.asset.version.starts_with('2') {
        return Err(decode_err(format!(
            "unsupported glTF version {}",
            doc.asset.version
        )));
    }

    let scene_index = doc.scene.unwrap_or(0);
    let model = ModelResource {
        name: doc.scenes.get(scene_index).and_then(|s| s.name.clone()),
        nodes: label_all(&doc.nodes, "node"),
        meshes: label_all(&doc.meshes, "mesh"),
    };

    Ok(ContainerResource {
        model: Arc::new(model),
        generator: doc.asset.generator,
        binary_len,
    })
}

fn label_all(items: &[Named], prefix: &str) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.name.clone().unwrap_or_else(|| format!("{}{}", prefix, i)))
        .collect()
}
