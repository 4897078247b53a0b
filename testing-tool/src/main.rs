use anyhow::Result;
use colored::*;
use reqwest::{Client, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::io::{self, Write};

struct Session {
    client: Client,
    base_url: String,
    token: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🚗 Dealership API Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: Pedir URL y token
    let session = get_session()?;

    // Paso 2: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📃 Listar vehículos");
        println!("2. 🔍 Obtener vehículo por id");
        println!("3. 💾 Crear vehículo de ejemplo");
        println!("4. 🗑️  Eliminar vehículo");
        println!("5. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-5): ")?;

        let result = match choice.as_str() {
            "1" => {
                let status = prompt("Filtrar por estado (vacío = todos): ")?;
                let mut query = Vec::new();
                if !status.is_empty() {
                    query.push(("status", status.as_str()));
                }
                call(&session, Method::GET, &query, None).await
            }
            "2" => {
                let id = prompt("Id: ")?;
                call(&session, Method::GET, &[("id", id.as_str())], None).await
            }
            "3" => call(&session, Method::POST, &[], Some(sample_vehicle())).await,
            "4" => {
                let id = prompt("Id: ")?;
                call(&session, Method::DELETE, &[("id", id.as_str())], None).await
            }
            "5" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                continue;
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌ Error de red:".bright_red(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn get_session() -> Result<Session> {
    println!("{}", "🔐 CONEXIÓN".bright_cyan().bold());
    println!("{}", "===========".bright_cyan());

    let base_url = prompt("URL base (ej: http://localhost:3000): ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:3000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };
    let token = prompt("Firebase ID token: ")?;

    Ok(Session {
        client: Client::new(),
        base_url,
        token,
    })
}

fn sample_vehicle() -> Value {
    json!({
        "stockNumber": format!("TT{}", unique_suffix()),
        "make": "Toyota",
        "model": "Hilux",
        "variant": "2.8 GD-6 Raider",
        "year": 2022,
        "mileage": 35000,
        "price": "350000",
        "branch": "Main",
        "images": ["https://example.com/hilux-front.jpg"],
        "features": ["Tow bar"]
    })
}

// Sufijo para que cada stock number de prueba sea distinto
fn unique_suffix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

async fn call(
    session: &Session,
    method: Method,
    query: &[(&str, &str)],
    body: Option<Value>,
) -> Result<()> {
    let request = build_request(session, method.clone(), query, body.as_ref())?;

    println!();
    println!("{} {} {}", "📤".bright_blue(), method, request.url());
    if let Some(body) = &body {
        println!("{}", "📦 Payload:".bright_blue());
        println!("{}", serde_json::to_string_pretty(body)?);
    }

    let response = session.client.execute(request).await?;
    let status = response.status();
    let text = response.text().await?;

    let label = format!("📥 Status: {}", status);
    if status.is_success() {
        println!("{}", label.bright_green());
    } else {
        println!("{}", label.bright_red());
    }

    if status == StatusCode::NO_CONTENT || text.is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}

// Los parámetros van por `query` para que reqwest los codifique
fn build_request(
    session: &Session,
    method: Method,
    query: &[(&str, &str)],
    body: Option<&Value>,
) -> Result<Request> {
    let url = format!("{}/api/vehicles", session.base_url);
    let mut request = session
        .client
        .request(method, &url)
        .query(query)
        .bearer_auth(&session.token);
    if let Some(body) = body {
        request = request.json(body);
    }
    Ok(request.build()?)
}
