//! Wire format for the multiplayer skin sync channel.
//!
//! Only the outbound half exists. A client serializes a [`SkinChangeRequest`]
//! and hands it to a [`SyncSender`]; the server-side broadcast that would fan
//! the change out to other clients was never implemented, so the request is
//! one-way and unacknowledged, with no retry or ordering guarantees. This is
//! an intentionally incomplete protocol surface and is documented as such,
//! not a finished feature.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use uuid::Uuid;

/// Channel a client uses to ask the server to fan a skin change out.
pub const SKIN_REQUEST_CHANNEL: &str = "customskin:skin_request";

/// Reserved for the server-to-client broadcast, which does not exist yet.
pub const SKIN_SYNC_CHANNEL: &str = "customskin:skin_sync";

/// Transport collaborator provided by the host. Fire-and-forget.
pub trait SyncSender {
    fn send(&mut self, channel: &str, payload: &[u8]);
}

/// Sender that drops every message, mirroring the unfinished broadcast path.
pub struct NullSync;

impl SyncSender for NullSync {
    fn send(&mut self, channel: &str, payload: &[u8]) {
        log::debug!("dropping {} byte message for channel '{channel}'", payload.len());
    }
}

/// A client's "I changed my skin" message.
///
/// Encoded in this exact field order: 128-bit player id, length-prefixed
/// UTF-8 path, slim flag byte, width, height. Integers are little-endian.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkinChangeRequest {
    pub player: Uuid,
    pub skin_path: String,
    pub slim: bool,
    pub width: i32,
    pub height: i32,
}

impl SkinChangeRequest {
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        writer.write_all(self.player.as_bytes())?;

        write_string(writer, &self.skin_path)?;

        writer.write_u8(self.slim as u8)?;
        writer.write_i32::<LittleEndian>(self.width)?;
        writer.write_i32::<LittleEndian>(self.height)?;

        Ok(())
    }

    pub fn read_from(reader: &mut impl Read) -> io::Result<SkinChangeRequest> {
        let mut id_bytes = [0u8; 16];
        reader.read_exact(&mut id_bytes)?;

        let skin_path = read_string(reader)?;

        let slim = reader.read_u8()? != 0;
        let width = reader.read_i32::<LittleEndian>()?;
        let height = reader.read_i32::<LittleEndian>()?;

        Ok(SkinChangeRequest {
            player: Uuid::from_bytes(id_bytes),
            skin_path,
            slim,
            width,
            height,
        })
    }
}

fn write_string(writer: &mut impl Write, string: &str) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(string.len() as u32)?;
    writer.write_all(string.as_bytes())
}

fn read_string(reader: &mut impl Read) -> io::Result<String> {
    let len = reader.read_u32::<LittleEndian>()? as usize;

    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;

    String::from_utf8(bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}
