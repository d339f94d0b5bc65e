use worker::*;

pub fn get_headers(origin: &str) -> Result<Headers> {
    let mut headers = Headers::new();
    headers.set("Access-Control-Allow-Origin", origin)?;
    headers.set("Access-Control-Allow-Methods", "GET, POST, PUT, PATCH, DELETE, OPTIONS")?;
    headers.set("Access-Control-Allow-Headers", "Content-Type, Authorization")?;
    headers.set("Access-Control-Max-Age", "86400")?; // 24 hours
    if origin != "*" {
        headers.set("Vary", "Origin")?;
    }
    Ok(headers)
}

pub fn add_headers(mut res: Response, origin: &str) -> Result<Response> {
    let cors_headers = get_headers(origin)?;
    for (key, value) in cors_headers.entries() {
        res.headers_mut().set(&key, &value)?;
    }
    Ok(res)
}

pub fn handle_preflight(origin: &str) -> Result<Response> {
    add_headers(Response::empty()?.with_status(204), origin)
}
