//! Plain-text HTTP endpoint answering overlap-area queries.
//!
//! `GET /?x1=..&y1=..&x2=..&y2=..&canvasWidth=..&canvasHeight=..` replies with
//! the area as a decimal number. `referenceWidth` and `referenceHeight`
//! optionally override the reference space.

use tiny_http::{Header, Method, Request, Response, Server};

use crate::error::ServerError;
use crate::geometry::{compute_overlap_area, format_area, CornerBox, ReferenceSpace};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapQuery {
    pub bbox: CornerBox,
    pub reference: ReferenceSpace,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl OverlapQuery {
    /// Parse a URL query string (without the leading `?`).
    pub fn parse(query: &str, default_reference: ReferenceSpace) -> Result<Self, ServerError> {
        let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();

        let lookup = |name: &'static str| -> Result<Option<f64>, ServerError> {
            match pairs.iter().find(|(key, _)| key == name) {
                Some((_, value)) => value
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| ServerError::InvalidParam {
                        name,
                        value: value.clone(),
                    }),
                None => Ok(None),
            }
        };
        let required = |name: &'static str| -> Result<f64, ServerError> {
            lookup(name)?.ok_or(ServerError::MissingParam(name))
        };

        Ok(Self {
            bbox: CornerBox::new(
                required("x1")?,
                required("y1")?,
                required("x2")?,
                required("y2")?,
            ),
            reference: ReferenceSpace {
                width: lookup("referenceWidth")?.unwrap_or(default_reference.width),
                height: lookup("referenceHeight")?.unwrap_or(default_reference.height),
            },
            canvas_width: required("canvasWidth")?,
            canvas_height: required("canvasHeight")?,
        })
    }

    pub fn area(&self) -> f64 {
        compute_overlap_area(
            &self.bbox,
            self.reference,
            self.canvas_width,
            self.canvas_height,
        )
    }
}

/// Status code and plain-text body of a reply.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// Route one request. Every path answers the same query.
pub fn handle(method: &Method, url: &str, reference: ReferenceSpace) -> Reply {
    let result = if *method == Method::Get {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        OverlapQuery::parse(query, reference).map(|q| format_area(q.area()))
    } else {
        Err(ServerError::MethodNotAllowed(method.as_str().to_string()))
    };

    match result {
        Ok(body) => Reply { status: 200, body },
        Err(e) => Reply {
            status: e.status_code(),
            body: e.to_string(),
        },
    }
}

/// Bind `addr` and answer requests one at a time until the listener fails.
pub fn serve(addr: &str, reference: ReferenceSpace) -> anyhow::Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;
    log::info!("overlap endpoint listening on {:?}", server.server_addr());

    for request in server.incoming_requests() {
        respond(request, reference);
    }
    Ok(())
}

fn respond(request: Request, reference: ReferenceSpace) {
    let reply = handle(request.method(), request.url(), reference);
    log::info!(
        "{} {} -> {} {}",
        request.method().as_str(),
        request.url(),
        reply.status,
        reply.body
    );

    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = "Content-Type: text/plain; charset=utf-8".parse::<Header>() {
        response = response.with_header(header);
    }
    if let Err(e) = request.respond(response) {
        log::warn!("failed to send response: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> Reply {
        handle(&Method::Get, url, ReferenceSpace::default())
    }

    #[test]
    fn answers_scaled_area() {
        let reply = get("/api?x1=0&y1=0&x2=400&y2=300&canvasWidth=1600&canvasHeight=1200");
        assert_eq!(reply, Reply { status: 200, body: "480000".into() });
    }

    #[test]
    fn reference_space_can_be_overridden() {
        let reply = get(
            "/?x1=0&y1=0&x2=100&y2=100&canvasWidth=200&canvasHeight=200\
             &referenceWidth=100&referenceHeight=100",
        );
        assert_eq!(reply.body, "40000");
    }

    #[test]
    fn fractional_area_keeps_decimals() {
        let reply = get("/?x1=0&y1=0&x2=1&y2=1&canvasWidth=400&canvasHeight=300");
        assert_eq!(reply.body, "0.25");
    }

    #[test]
    fn missing_parameter_is_bad_request() {
        let reply = get("/?x1=0&y1=0&x2=1&canvasWidth=400&canvasHeight=300");
        assert_eq!(reply.status, 400);
        assert!(reply.body.contains("y2"));
    }

    #[test]
    fn unparsable_parameter_is_bad_request() {
        let reply = get("/?x1=zero&y1=0&x2=1&y2=1&canvasWidth=400&canvasHeight=300");
        assert_eq!(reply.status, 400);
        assert!(reply.body.contains("x1"));
    }

    #[test]
    fn no_query_at_all_is_bad_request() {
        assert_eq!(get("/").status, 400);
    }

    #[test]
    fn only_get_is_served() {
        let reply = handle(&Method::Post, "/?x1=0", ReferenceSpace::default());
        assert_eq!(reply.status, 405);
    }
}
