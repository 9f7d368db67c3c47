use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};

use log::info;

use super::BoundedQueue;
use crate::error::QueueError;

/// A queue backend speaking the list commands of a Redis-compatible
/// store over a single TCP connection.
///
/// Units are pushed to the tail with RPUSH, popped from the head with
/// LPOP and counted with LLEN, all against one fixed key. Only the three
/// reply shapes those commands produce are understood; anything else is
/// a protocol error.
pub struct RedisQueue {
	stream: BufReader<TcpStream>,
	key: String,
}

/// The subset of wire replies the adapter understands.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
	Integer(i64),
	Bulk(Option<String>),
	Simple(String),
}

impl RedisQueue {
	/// Connects to the store at `addr` and binds the adapter to `key`.
	///
	/// # Errors
	/// Fails if the TCP connection cannot be established.
	pub fn connect<A: ToSocketAddrs>(addr: A, key: &str) -> Result<Self, QueueError> {
		let stream = TcpStream::connect(addr)?;
		info!("connected to queue backend, key {key:?}");
		Ok(Self { stream: BufReader::new(stream), key: key.to_owned() })
	}

	/// Sends one command and reads back its reply.
	fn command(&mut self, args: &[&str]) -> Result<Reply, QueueError> {
		let request = encode_command(args);
		self.stream.get_mut().write_all(&request)?;
		self.stream.get_mut().flush()?;
		read_reply(&mut self.stream)
	}
}

impl BoundedQueue for RedisQueue {
	fn push(&mut self, unit: &str) -> Result<(), QueueError> {
		let key = self.key.clone();
		match self.command(&["RPUSH", &key, unit])? {
			Reply::Integer(_) => Ok(()),
			other => Err(QueueError::Protocol(format!("RPUSH replied {other:?}"))),
		}
	}

	fn pop(&mut self) -> Result<String, QueueError> {
		let key = self.key.clone();
		match self.command(&["LPOP", &key])? {
			Reply::Bulk(Some(unit)) => Ok(unit),
			Reply::Bulk(None) => Err(QueueError::Empty),
			other => Err(QueueError::Protocol(format!("LPOP replied {other:?}"))),
		}
	}

	fn len(&mut self) -> Result<usize, QueueError> {
		let key = self.key.clone();
		match self.command(&["LLEN", &key])? {
			Reply::Integer(len) if len >= 0 => Ok(len as usize),
			other => Err(QueueError::Protocol(format!("LLEN replied {other:?}"))),
		}
	}
}

/// Encodes `args` as one RESP array of bulk strings.
fn encode_command(args: &[&str]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(format!("*{}\r\n", args.len()).as_bytes());
	for arg in args {
		out.extend_from_slice(format!("${}\r\n", arg.len()).as_bytes());
		out.extend_from_slice(arg.as_bytes());
		out.extend_from_slice(b"\r\n");
	}
	out
}

/// Reads one reply from the wire.
fn read_reply<R: BufRead>(reader: &mut R) -> Result<Reply, QueueError> {
	let mut line = String::new();
	if reader.read_line(&mut line)? == 0 {
		return Err(QueueError::Protocol("connection closed mid-reply".to_owned()));
	}
	let line = line.trim_end_matches(['\r', '\n']);
	let (kind, rest) = line.split_at(1.min(line.len()));

	match kind {
		"+" => Ok(Reply::Simple(rest.to_owned())),
		"-" => Err(QueueError::Backend(rest.to_owned())),
		":" => rest
			.parse()
			.map(Reply::Integer)
			.map_err(|_| QueueError::Protocol(format!("bad integer reply {rest:?}"))),
		"$" => {
			let len: i64 = rest
				.parse()
				.map_err(|_| QueueError::Protocol(format!("bad bulk length {rest:?}")))?;
			if len < 0 {
				return Ok(Reply::Bulk(None));
			}
			// Bulk payload is exactly len bytes plus the trailing CRLF.
			let mut payload = vec![0; len as usize + 2];
			reader.read_exact(&mut payload)?;
			payload.truncate(len as usize);
			String::from_utf8(payload)
				.map(|unit| Reply::Bulk(Some(unit)))
				.map_err(|_| QueueError::Protocol("bulk reply is not utf-8".to_owned()))
		}
		_ => Err(QueueError::Protocol(format!("unknown reply line {line:?}"))),
	}
}
